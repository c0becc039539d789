//! Stream Telemetry Plotter
//!
//! Turns the CSV telemetry logs of a video streaming pipeline (encoder,
//! decoder and round-trip time) into per-second time-series charts of
//! encoding latency, decoding latency, throughput and RTT.

pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, FrameRecord, TelemetryLog, TimeSeries};
pub use charts::{ChartRenderer, ChartRendererFactory, ChartSpec, PlottersRenderer};
pub use pipeline::Pipeline;
pub use report::RunReport;
pub use stats::{SeriesSummary, WindowAggregator};
pub use telemetry::TelemetryLoader;
pub use types::{ChartKind, ImageFormat, LogKind};
pub use output::{OutputFormatter, ColoredFormatter, PlainFormatter, OutputCoordinator, OutputFormatterFactory};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Frames per aggregation window
    pub const DEFAULT_FPS: u32 = 24;
    /// Leading throughput windows discarded as warm-up
    pub const DEFAULT_WARMUP_WINDOWS: usize = 2;
    pub const DEFAULT_OUTPUT_DIR: &str = ".";
    /// Width and height in pixels
    pub const DEFAULT_CHART_SIZE: (u32, u32) = (640, 480);
    pub const DEFAULT_SERIES_LABEL: &str = "Baseline";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
