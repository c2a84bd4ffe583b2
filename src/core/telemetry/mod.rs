//! Telemetry aggregation engine.
//!
//! Merges several independent, slow, unreliable external data sources
//! into cached point-in-time snapshots: a long-lived sensor-feed child
//! process, consolidated shell queries, and per-concern probes. Data
//! flows one way, from the external tools through the command port and
//! sensor monitor into the aggregators, whose cached snapshots are what
//! consumers read. Aggregator calls never fail and never overlap;
//! concurrent polls share one invocation set.

mod basic;
mod engine;
mod extended;
pub mod fallback;
mod guard;
pub mod probes;
mod sensor_monitor;
mod snapshot;

pub use basic::BasicStatsAggregator;
pub use engine::TelemetryEngine;
pub use extended::ExtendedStatsAggregator;
pub use fallback::{Provenance, TemperatureEstimator};
pub use guard::PollGuard;
pub use sensor_monitor::{
    LineAssembler, MonitorStatus, SensorMonitor, SensorReadings, SensorState,
};
pub use snapshot::{BasicSnapshot, ExtendedSnapshot, UNAVAILABLE, UNAVAILABLE_COUNT};
