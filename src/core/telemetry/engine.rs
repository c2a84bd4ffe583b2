//! Telemetry engine service object.
//!
//! Owns the sensor monitor and both aggregators. Constructed once at
//! startup; every consumer polls through this type rather than reaching
//! into component state.

use std::sync::Arc;

use crate::core::config::EngineConfig;
use crate::error::Result;

use super::basic::BasicStatsAggregator;
use super::extended::ExtendedStatsAggregator;
use super::sensor_monitor::{MonitorStatus, SensorMonitor, SensorReadings};
use super::snapshot::{BasicSnapshot, ExtendedSnapshot};

pub struct TelemetryEngine {
    sensors: Arc<SensorMonitor>,
    basic: BasicStatsAggregator,
    extended: ExtendedStatsAggregator,
}

impl TelemetryEngine {
    pub fn new(config: EngineConfig) -> Self {
        let config = Arc::new(config);
        let sensors = Arc::new(SensorMonitor::new(config.monitor.clone()));
        let basic = BasicStatsAggregator::new(config.clone(), sensors.clone());
        let extended = ExtendedStatsAggregator::new(config.clone(), sensors.clone());
        Self {
            sensors,
            basic,
            extended,
        }
    }

    /// Launch the background sensor monitor. The aggregators work without
    /// it; they just fall through to the estimation/vendor tiers.
    pub async fn start(&self) -> Result<()> {
        self.sensors.start().await
    }

    /// Best-effort snapshot of CPU/RAM/disk/temperature. Never fails.
    pub async fn basic_stats(&self) -> Arc<BasicSnapshot> {
        self.basic.poll().await
    }

    /// Best-effort extended snapshot. Never fails.
    pub async fn extended_stats(&self) -> Arc<ExtendedSnapshot> {
        self.extended.poll().await
    }

    /// True once the sensor monitor has ever delivered a real CPU
    /// reading; lets consumers tell "not warmed up" from "measured low".
    pub fn sensors_available(&self) -> bool {
        self.sensors.available()
    }

    pub fn sensor_status(&self) -> MonitorStatus {
        self.sensors.status()
    }

    pub fn sensor_readings(&self) -> SensorReadings {
        self.sensors.latest()
    }

    /// Kill the monitor child and remove temp artifacts. Idempotent.
    pub async fn shutdown(&self) {
        self.sensors.stop().await;
    }
}
