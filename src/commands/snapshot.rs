//! One-shot snapshot command.

use anyhow::Result;
use clap::ArgMatches;

use crate::core::config::EngineConfig;
use crate::core::telemetry::TelemetryEngine;
use crate::ui;

use super::build_runtime;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let extended = matches.get_flag("extended");
    let json = matches.get_flag("json");

    let runtime = build_runtime()?;
    runtime.block_on(async move {
        let engine = TelemetryEngine::new(EngineConfig::default());
        if let Err(e) = engine.start().await {
            log::warn!("sensor monitor unavailable: {}", e);
        }

        if extended {
            let snap = engine.extended_stats().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&*snap)?);
            } else {
                ui::print_extended(&snap, engine.sensors_available());
            }
        } else {
            let snap = engine.basic_stats().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&*snap)?);
            } else {
                ui::print_basic(&snap, engine.sensors_available());
            }
        }

        engine.shutdown().await;
        Ok(())
    })
}
