//! Engine configuration.
//!
//! Plain structs built once at startup and handed to the telemetry engine.
//! Nothing here is persisted; callers that want different timeouts or a
//! different restart policy construct the config themselves.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the telemetry engine and its probes.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Drive letter of the volume reported by the basic disk figure.
    pub primary_volume: String,
    /// Host pinged by the fast probe for the latency figure.
    pub latency_target: String,
    /// Timeout for the consolidated basic-stats query.
    pub consolidated_timeout: Duration,
    /// Timeout for the fast system/clock/latency probe.
    pub fast_probe_timeout: Duration,
    /// Timeout for the per-core/disk counter probe (includes its 1s sample).
    pub counter_probe_timeout: Duration,
    /// Timeout for the network throughput/Wi-Fi probe (includes its
    /// double-sample interval).
    pub network_probe_timeout: Duration,
    /// Timeout for the GPU vendor query binary.
    pub gpu_probe_timeout: Duration,
    /// When no sensor reading exists, synthesize a temperature from CPU
    /// load. With this off the basic snapshot reports no temperature at
    /// all instead of an estimate.
    pub estimate_temperature: bool,
    /// Adds the smooth oscillation term to estimated temperatures so the
    /// displayed value is not frozen. Cosmetic only; never applied to
    /// real sensor readings.
    pub temperature_jitter: bool,
    pub monitor: MonitorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary_volume: "C:".to_string(),
            latency_target: "8.8.8.8".to_string(),
            consolidated_timeout: Duration::from_secs(8),
            fast_probe_timeout: Duration::from_secs(8),
            counter_probe_timeout: Duration::from_secs(10),
            network_probe_timeout: Duration::from_secs(8),
            gpu_probe_timeout: Duration::from_secs(5),
            estimate_temperature: true,
            temperature_jitter: true,
            monitor: MonitorConfig::default(),
        }
    }
}

/// Configuration for the background sensor monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Fixed path of the persistent polling script. Lives in the OS temp
    /// directory and is removed at shutdown.
    pub script_path: PathBuf,
    /// Seconds between sensor emissions inside the polling script.
    pub poll_interval_secs: u32,
    pub restart: RestartPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            script_path: env::temp_dir().join("vitals-sensor-loop.ps1"),
            poll_interval_secs: 2,
            restart: RestartPolicy::Never,
        }
    }
}

/// What to do when the sensor monitor child exits on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestartPolicy {
    /// Start exactly once; an exited monitor stays exited. Last-known
    /// readings remain visible either way.
    Never,
    /// Respawn the child with exponential backoff, giving up after
    /// `max_attempts` consecutive failures.
    OnExit {
        max_attempts: u32,
        backoff: Duration,
    },
}
