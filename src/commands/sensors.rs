//! Sensor monitor status command.

use std::time::Duration;

use anyhow::Result;
use clap::ArgMatches;

use crate::core::config::EngineConfig;
use crate::core::telemetry::TelemetryEngine;
use crate::ui;

use super::build_runtime;

pub fn execute(_matches: &ArgMatches) -> Result<()> {
    let runtime = build_runtime()?;
    runtime.block_on(async move {
        let engine = TelemetryEngine::new(EngineConfig::default());
        if let Err(e) = engine.start().await {
            log::warn!("sensor monitor unavailable: {}", e);
        }

        // Give the child a moment to emit its first records.
        for _ in 0..6 {
            if engine.sensors_available() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        ui::print_sensor_status(
            engine.sensor_status(),
            engine.sensors_available(),
            &engine.sensor_readings(),
        );

        engine.shutdown().await;
        Ok(())
    })
}
