//! Data models and structures for the telemetry plotter

pub mod config;
pub mod records;
pub mod series;

// Re-export main model types
pub use config::Config;
pub use records::{FrameRecord, TelemetryLog};
pub use series::{SeriesPoint, TimeSeries};
