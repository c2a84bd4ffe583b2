use std::io;
use thiserror::Error;

/// Custom error type for the vitals application
#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Elevation required: {0}")]
    ElevationRequired(String),

    #[error("Sensor monitor error: {0}")]
    SensorMonitor(String),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the vitals application
pub type Result<T> = std::result::Result<T, VitalsError>;

impl VitalsError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        VitalsError::Config(msg.into())
    }

    /// Create an elevation required error
    pub fn elevation_required<S: Into<String>>(msg: S) -> Self {
        VitalsError::ElevationRequired(msg.into())
    }

    pub fn sensor_monitor<S: Into<String>>(msg: S) -> Self {
        VitalsError::SensorMonitor(msg.into())
    }

    pub fn probe<S: Into<String>>(msg: S) -> Self {
        VitalsError::Probe(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        VitalsError::MetricCollection(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        VitalsError::Other(msg.into())
    }
}
