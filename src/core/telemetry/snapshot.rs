//! Snapshot types produced by the aggregators.
//!
//! A snapshot is immutable once returned; callers hold it behind `Arc`
//! and a newer completed poll replaces the aggregator's last-good slot.
//! Numeric fields use the [`UNAVAILABLE`] sentinel rather than zero when
//! a source produced nothing, so consumers can tell "measured zero" from
//! "no data".

use serde::{Deserialize, Serialize};

use super::fallback::Provenance;

/// Sentinel for numeric fields whose source produced no value.
pub const UNAVAILABLE: f64 = -1.0;

/// Sentinel for integer rate/count fields.
pub const UNAVAILABLE_COUNT: i64 = -1;

/// Result of one basic poll: the consolidated CPU/RAM/Disk query plus the
/// resolved temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicSnapshot {
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub disk_percent: f64,
    /// [`UNAVAILABLE`] when `temperature_source` is `none`.
    pub temperature_celsius: f64,
    pub temperature_source: Provenance,
    /// Unix timestamp of the poll that produced this snapshot.
    pub captured_at: i64,
}

impl Default for BasicSnapshot {
    fn default() -> Self {
        Self {
            cpu_percent: 0.0,
            ram_percent: 0.0,
            disk_percent: 0.0,
            temperature_celsius: UNAVAILABLE,
            temperature_source: Provenance::None,
            captured_at: 0,
        }
    }
}

/// Result of one extended poll across the four probes and the sensor
/// monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedSnapshot {
    pub cpu_clock_mhz: f64,
    /// Ordered by logical processor index; empty when the counter probe
    /// produced nothing.
    pub per_core_cpu_percent: Vec<f32>,
    pub gpu_usage_percent: f64,
    pub gpu_temp_celsius: f64,
    pub gpu_vram_used_mib: f64,
    pub gpu_vram_total_mib: f64,
    pub network_up_bytes_per_sec: i64,
    pub network_down_bytes_per_sec: i64,
    pub wifi_ssid: Option<String>,
    pub wifi_signal_percent: i64,
    pub ram_used_gb: f64,
    pub ram_total_gb: f64,
    pub disk_read_bytes_per_sec: i64,
    pub disk_write_bytes_per_sec: i64,
    pub process_count: i64,
    /// Human-readable uptime, e.g. `3d 4h 12m`. Empty when unknown.
    pub system_uptime: String,
    pub latency_ms: i64,
    pub captured_at: i64,
}

impl Default for ExtendedSnapshot {
    fn default() -> Self {
        Self {
            cpu_clock_mhz: UNAVAILABLE,
            per_core_cpu_percent: Vec::new(),
            gpu_usage_percent: UNAVAILABLE,
            gpu_temp_celsius: UNAVAILABLE,
            gpu_vram_used_mib: UNAVAILABLE,
            gpu_vram_total_mib: UNAVAILABLE,
            network_up_bytes_per_sec: UNAVAILABLE_COUNT,
            network_down_bytes_per_sec: UNAVAILABLE_COUNT,
            wifi_ssid: None,
            wifi_signal_percent: UNAVAILABLE_COUNT,
            ram_used_gb: UNAVAILABLE,
            ram_total_gb: UNAVAILABLE,
            disk_read_bytes_per_sec: UNAVAILABLE_COUNT,
            disk_write_bytes_per_sec: UNAVAILABLE_COUNT,
            process_count: UNAVAILABLE_COUNT,
            system_uptime: String::new(),
            latency_ms: UNAVAILABLE_COUNT,
            captured_at: 0,
        }
    }
}
