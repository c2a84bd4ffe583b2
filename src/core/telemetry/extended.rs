//! Extended stats aggregator: per-core CPU, disk I/O, network, GPU.
//!
//! Four probes run concurrently per poll, each with its own timeout and
//! its own failure domain; the results are merged by field-level
//! precedence, never by arrival order.

use std::sync::Arc;

use crate::core::config::EngineConfig;
use crate::platform::derived;

use super::fallback;
use super::guard::PollGuard;
use super::probes::counters::{self, CounterReading};
use super::probes::fast::{self, FastReading};
use super::probes::gpu::{self, GpuProbeReading};
use super::probes::network::{self, NetworkReading};
use super::sensor_monitor::{SensorMonitor, SensorReadings};
use super::snapshot::ExtendedSnapshot;

pub struct ExtendedStatsAggregator {
    config: Arc<EngineConfig>,
    sensors: Arc<SensorMonitor>,
    guard: PollGuard<ExtendedSnapshot>,
}

impl ExtendedStatsAggregator {
    pub fn new(config: Arc<EngineConfig>, sensors: Arc<SensorMonitor>) -> Self {
        Self {
            config,
            sensors,
            guard: PollGuard::new(),
        }
    }

    /// One poll under the overlap guard; same contract as the basic
    /// aggregator, typically called at a slower interval.
    pub async fn poll(&self) -> Arc<ExtendedSnapshot> {
        self.guard.run(|| self.collect()).await
    }

    pub fn last_good(&self) -> Option<Arc<ExtendedSnapshot>> {
        self.guard.last_good()
    }

    async fn collect(&self) -> ExtendedSnapshot {
        // Fan out, wait for all. Each probe absorbs its own failure, so a
        // hung or dead source never cancels the other three.
        let (fast, counter, net, vendor) = tokio::join!(
            fast::collect(&self.config),
            counters::collect(&self.config),
            network::collect(&self.config),
            gpu::collect(&self.config),
        );

        let sensors = self.sensors.available().then(|| self.sensors.latest());
        let mut snap = merge(fast, counter, net, vendor, sensors);

        // Derived tier for figures the fast probe failed to deliver.
        if !fallback::known(snap.ram_total_gb) {
            if let Some((used, total)) = derived::ram_used_total_gb() {
                log::debug!("ram figures derived from OS-reported memory");
                snap.ram_used_gb = used;
                snap.ram_total_gb = total;
            }
        }
        if snap.system_uptime.is_empty() {
            snap.system_uptime = derived::uptime_text();
        }

        snap.captured_at = chrono::Utc::now().timestamp();
        snap
    }
}

/// Merge probe results into one snapshot. Failed probes leave their
/// fields at the sentinel defaults; GPU fields prefer the sensor
/// monitor's reading over the vendor tool's.
fn merge(
    fast: Option<FastReading>,
    counter: Option<CounterReading>,
    net: Option<NetworkReading>,
    vendor: Option<GpuProbeReading>,
    sensors: Option<SensorReadings>,
) -> ExtendedSnapshot {
    let mut snap = ExtendedSnapshot::default();

    if let Some(f) = fast {
        if let Some(v) = f.cpu_clock_mhz {
            snap.cpu_clock_mhz = v;
        }
        if let Some(v) = f.ram_used_gb {
            snap.ram_used_gb = v;
        }
        if let Some(v) = f.ram_total_gb {
            snap.ram_total_gb = v;
        }
        if let Some(v) = f.process_count {
            snap.process_count = v;
        }
        if let Some(v) = f.uptime_text {
            snap.system_uptime = v;
        }
        if let Some(v) = f.latency_ms {
            snap.latency_ms = v;
        }
    }

    if let Some(c) = counter {
        snap.per_core_cpu_percent = c.per_core_percent;
        if let Some(v) = c.disk_read_bytes_per_sec {
            snap.disk_read_bytes_per_sec = v;
        }
        if let Some(v) = c.disk_write_bytes_per_sec {
            snap.disk_write_bytes_per_sec = v;
        }
    }

    if let Some(n) = net {
        if let Some(v) = n.up_bytes_per_sec {
            snap.network_up_bytes_per_sec = v;
        }
        if let Some(v) = n.down_bytes_per_sec {
            snap.network_down_bytes_per_sec = v;
        }
        snap.wifi_ssid = n.wifi_ssid;
        if let Some(v) = n.wifi_signal_percent {
            snap.wifi_signal_percent = v;
        }
    }

    let sensor = sensors.unwrap_or_default();
    let vendor = vendor.unwrap_or_default();
    let measured = |v: f64| fallback::known(v).then_some(v);
    snap.gpu_usage_percent = fallback::resolve(measured(sensor.gpu_usage), vendor.usage_percent, None).0;
    snap.gpu_temp_celsius = fallback::resolve(measured(sensor.gpu_temp), vendor.temp_celsius, None).0;
    snap.gpu_vram_used_mib =
        fallback::resolve(measured(sensor.vram_used_mib), vendor.vram_used_mib, None).0;
    snap.gpu_vram_total_mib =
        fallback::resolve(measured(sensor.vram_total_mib), vendor.vram_total_mib, None).0;

    snap
}
