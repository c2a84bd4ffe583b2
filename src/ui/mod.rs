// UI module - terminal rendering of telemetry snapshots

pub mod snapshot_formatters;

pub use snapshot_formatters::{print_basic, print_extended, print_sensor_status};
