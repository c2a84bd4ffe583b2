//! Multi-source fallback policy.
//!
//! Every numeric metric has up to three provenances: measured by a real
//! sensor or probe, derived from a cheaper always-available OS source, or
//! estimated by a deterministic formula. The chosen tier is carried next
//! to the value instead of being silently presented as a measurement.
//! Both aggregators resolve through this module; the precedence rule
//! lives nowhere else.

use serde::{Deserialize, Serialize};

use super::snapshot::UNAVAILABLE;

/// Source tier of a metric value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Read from a real sensor or probe.
    Sensor,
    /// Computed from an OS-reported figure.
    Derived,
    /// Synthesized by a formula; not a measurement.
    Estimated,
    /// No tier produced a value.
    #[default]
    None,
}

/// Pick the highest-priority value that exists.
pub fn resolve(
    measured: Option<f64>,
    derived: Option<f64>,
    estimated: Option<f64>,
) -> (f64, Provenance) {
    if let Some(v) = measured {
        return (v, Provenance::Sensor);
    }
    if let Some(v) = derived {
        return (v, Provenance::Derived);
    }
    if let Some(v) = estimated {
        return (v, Provenance::Estimated);
    }
    (UNAVAILABLE, Provenance::None)
}

/// True when a sentinel-carrying field holds an actual value.
pub fn known(value: f64) -> bool {
    value >= 0.0
}

const ESTIMATE_BASE_CELSIUS: f64 = 34.0;
const ESTIMATE_PER_LOAD_POINT: f64 = 0.45;
const ESTIMATE_FLOOR: f64 = 30.0;
const ESTIMATE_CEILING: f64 = 95.0;
const JITTER_AMPLITUDE: f64 = 3.0;
const JITTER_PERIOD_SECS: f64 = 45.0;

/// Last-resort CPU temperature estimator.
///
/// Produces a plausible figure from current CPU load when no sensor has
/// ever reported. The optional sinusoidal term only keeps the displayed
/// value from freezing in place; it is cosmetic and the output must never
/// be treated as a reading. Time enters through [`estimate_at`], so the
/// formula is exact under test.
///
/// [`estimate_at`]: TemperatureEstimator::estimate_at
#[derive(Debug)]
pub struct TemperatureEstimator {
    started: std::time::Instant,
    jitter: bool,
}

impl TemperatureEstimator {
    pub fn new(jitter: bool) -> Self {
        Self {
            started: std::time::Instant::now(),
            jitter,
        }
    }

    /// Estimate from CPU load using wall-clock elapsed time for the
    /// oscillation phase.
    pub fn estimate(&self, cpu_percent: f64) -> f64 {
        self.estimate_at(cpu_percent, self.started.elapsed().as_secs_f64())
    }

    /// Deterministic form: base plus load scaling plus (optionally) a
    /// smooth oscillation at `elapsed_secs`, clamped to a plausible range.
    pub fn estimate_at(&self, cpu_percent: f64, elapsed_secs: f64) -> f64 {
        let load = cpu_percent.clamp(0.0, 100.0);
        let mut celsius = ESTIMATE_BASE_CELSIUS + ESTIMATE_PER_LOAD_POINT * load;
        if self.jitter {
            let phase = elapsed_secs / JITTER_PERIOD_SECS * std::f64::consts::TAU;
            celsius += JITTER_AMPLITUDE * phase.sin();
        }
        celsius.clamp(ESTIMATE_FLOOR, ESTIMATE_CEILING)
    }
}
