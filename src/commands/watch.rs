//! Interval polling command. Runs until interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::ArgMatches;
use colored::Colorize;

use crate::core::config::EngineConfig;
use crate::core::telemetry::TelemetryEngine;
use crate::ui;

use super::build_runtime;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let interval_secs = *matches.get_one::<u64>("interval").expect("has default");
    let extended = matches.get_flag("extended");

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })?;

    let runtime = build_runtime()?;
    runtime.block_on(async move {
        let engine = TelemetryEngine::new(EngineConfig::default());
        if let Err(e) = engine.start().await {
            log::warn!("sensor monitor unavailable: {}", e);
        }

        while running.load(Ordering::SeqCst) {
            println!(
                "{}",
                format!("-- {} --", Local::now().format("%H:%M:%S")).dimmed()
            );
            if extended {
                let snap = engine.extended_stats().await;
                ui::print_extended(&snap, engine.sensors_available());
            } else {
                let snap = engine.basic_stats().await;
                ui::print_basic(&snap, engine.sensors_available());
            }
            println!();

            // Sleep in short steps so Ctrl-C lands promptly.
            for _ in 0..interval_secs.saturating_mul(5) {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        }

        engine.shutdown().await;
        println!("stopped");
        Ok(())
    })
}
