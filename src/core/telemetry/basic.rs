//! Basic stats aggregator: CPU, RAM, disk, temperature.

use std::sync::Arc;

use crate::core::config::EngineConfig;
use crate::platform::derived;

use super::fallback::{self, TemperatureEstimator};
use super::guard::PollGuard;
use super::probes::consolidated;
use super::sensor_monitor::SensorMonitor;
use super::snapshot::BasicSnapshot;

/// Issues one consolidated query per poll and resolves the temperature
/// through the sensor-first fallback chain. Constructed once and held by
/// the engine for the life of the process.
pub struct BasicStatsAggregator {
    config: Arc<EngineConfig>,
    sensors: Arc<SensorMonitor>,
    estimator: TemperatureEstimator,
    guard: PollGuard<BasicSnapshot>,
}

impl BasicStatsAggregator {
    pub fn new(config: Arc<EngineConfig>, sensors: Arc<SensorMonitor>) -> Self {
        let estimator = TemperatureEstimator::new(config.temperature_jitter);
        Self {
            config,
            sensors,
            estimator,
            guard: PollGuard::new(),
        }
    }

    /// One poll. Safe to call on a short fixed interval: concurrent
    /// callers share the in-flight result instead of spawning more
    /// external work, and every probe failure degrades to a fallback
    /// rather than an error.
    pub async fn poll(&self) -> Arc<BasicSnapshot> {
        self.guard.run(|| self.collect()).await
    }

    pub fn last_good(&self) -> Option<Arc<BasicSnapshot>> {
        self.guard.last_good()
    }

    async fn collect(&self) -> BasicSnapshot {
        // A rejected or missing field keeps its previous value; 0 only on
        // the first ever poll.
        let prior = self.guard.last_good();
        let (mut cpu, mut ram, mut disk) = prior
            .map(|p| (p.cpu_percent, p.ram_percent, p.disk_percent))
            .unwrap_or((0.0, 0.0, 0.0));

        let mut ram_measured = false;
        match consolidated::collect(&self.config).await {
            Some(reading) => {
                if let Some(v) = reading.cpu_percent {
                    cpu = v;
                }
                if let Some(v) = reading.ram_percent {
                    ram = v;
                    ram_measured = true;
                }
                if let Some(v) = reading.disk_percent {
                    disk = v;
                }
            }
            None => log::debug!("basic poll got no consolidated data; serving fallbacks"),
        }

        if !ram_measured {
            if let Some(v) = derived::ram_percent() {
                log::debug!("ram figure derived from OS-reported memory");
                ram = v;
            }
        }

        let sensor_temp = {
            let reading = self.sensors.latest();
            (self.sensors.available() && reading.cpu_temp > 0.0).then_some(reading.cpu_temp)
        };
        let estimated = self
            .config
            .estimate_temperature
            .then(|| self.estimator.estimate(cpu));
        let (temperature_celsius, temperature_source) =
            fallback::resolve(sensor_temp, None, estimated);

        BasicSnapshot {
            cpu_percent: cpu,
            ram_percent: ram,
            disk_percent: disk,
            temperature_celsius,
            temperature_source,
            captured_at: chrono::Utc::now().timestamp(),
        }
    }
}
