//! External probes issued by the aggregators.
//!
//! One module per probe. Each owns its script (or binary invocation) and
//! exactly one parser for the grammar it emits; no probe's output format
//! is interpreted anywhere else. Collection functions absorb their own
//! failures and return `None`, so a dead or hung source degrades only its
//! own fields.

pub mod consolidated;
pub mod counters;
pub mod fast;
pub mod gpu;
pub mod network;

/// Field delimiter for the single-line probe grammars. Three characters
/// so that free-text fields (uptime, SSID) cannot collide with it.
pub const FIELD_DELIMITER: &str = "|||";

/// Parse an optional numeric field, treating empty/garbage as absent.
pub(crate) fn numeric_field<T: std::str::FromStr>(field: Option<&str>) -> Option<T> {
    field?.trim().parse().ok()
}

/// Parse a percentage field, rejecting values outside [0, 100].
pub(crate) fn percent_field(field: Option<&str>) -> Option<f64> {
    let value: f64 = numeric_field(field)?;
    (0.0..=100.0).contains(&value).then_some(value)
}
