//! Configuration data model and validation

use crate::logging::LogFormat;
use crate::types::{AppError, ChartKind, ImageFormat, LogKind, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Encoder log path
    #[serde(default)]
    pub encoder_log: Option<PathBuf>,

    /// Decoder log path
    #[serde(default)]
    pub decoder_log: Option<PathBuf>,

    /// RTT log path
    #[serde(default)]
    pub rtt_log: Option<PathBuf>,

    /// Directory the charts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Video frame rate; one aggregation window spans this many frames
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Leading throughput windows to discard
    #[serde(default = "default_warmup_windows")]
    pub warmup_windows: usize,

    /// Charts explicitly requested; empty means every chart with a source log
    #[serde(default)]
    pub charts: Vec<ChartKind>,

    /// Image encoding
    #[serde(default)]
    pub image_format: ImageFormat,

    /// Image width in pixels
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    /// Image height in pixels
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,

    /// Throughput legend label
    #[serde(default = "default_series_label")]
    pub series_label: String,

    /// Optional path of a JSON run report
    #[serde(default)]
    pub summary_path: Option<PathBuf>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Diagnostic log line format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoder_log: None,
            decoder_log: None,
            rtt_log: None,
            output_dir: default_output_dir(),
            fps: default_fps(),
            warmup_windows: default_warmup_windows(),
            charts: Vec::new(),
            image_format: ImageFormat::default(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            series_label: default_series_label(),
            summary_path: None,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Path configured for a log kind
    pub fn log_path(&self, kind: LogKind) -> Option<&Path> {
        match kind {
            LogKind::Encoder => self.encoder_log.as_deref(),
            LogKind::Decoder => self.decoder_log.as_deref(),
            LogKind::Rtt => self.rtt_log.as_deref(),
        }
    }

    /// Charts to render: the explicit selection, or every chart whose source is configured
    pub fn selected_charts(&self) -> Vec<ChartKind> {
        if self.charts.is_empty() {
            ChartKind::ALL
                .iter()
                .copied()
                .filter(|kind| self.log_path(kind.source()).is_some())
                .collect()
        } else {
            let mut charts = Vec::with_capacity(self.charts.len());
            for kind in &self.charts {
                if !charts.contains(kind) {
                    charts.push(*kind);
                }
            }
            charts
        }
    }

    /// Output file for a chart
    pub fn chart_path(&self, kind: ChartKind) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", kind.file_stem(), self.image_format.extension()))
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.encoder_log.is_none() && self.decoder_log.is_none() && self.rtt_log.is_none() {
            return Err(AppError::config(
                "No telemetry log given; use --encoder, --decoder or --rtt",
            ));
        }

        for kind in [LogKind::Encoder, LogKind::Decoder, LogKind::Rtt] {
            if let Some(path) = self.log_path(kind) {
                if path.as_os_str().is_empty() {
                    return Err(AppError::config(format!("{} log path cannot be empty", kind)));
                }
            }
        }

        for chart in &self.charts {
            if self.log_path(chart.source()).is_none() {
                return Err(AppError::config(format!(
                    "Chart '{}' needs the {} log, which was not given",
                    chart,
                    chart.source()
                )));
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(AppError::config("Output directory cannot be empty"));
        }

        if self.fps == 0 {
            return Err(AppError::validation("FPS must be greater than 0"));
        }

        if self.fps > 240 {
            return Err(AppError::validation("FPS cannot exceed 240"));
        }

        if !(100..=8192).contains(&self.chart_width) || !(100..=8192).contains(&self.chart_height) {
            return Err(AppError::validation(format!(
                "Chart size {}x{} is outside 100..=8192 pixels",
                self.chart_width, self.chart_height
            )));
        }

        if self.series_label.trim().is_empty() {
            return Err(AppError::validation("Series label cannot be empty"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge `STP_*` settings from any key lookup (process environment, parsed .env, tests)
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("STP_ENCODER_LOG") {
            self.encoder_log = non_empty_path(&path);
        }

        if let Some(path) = lookup("STP_DECODER_LOG") {
            self.decoder_log = non_empty_path(&path);
        }

        if let Some(path) = lookup("STP_RTT_LOG") {
            self.rtt_log = non_empty_path(&path);
        }

        if let Some(dir) = lookup("STP_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir.trim());
            }
        }

        if let Some(fps) = lookup("STP_FPS") {
            self.fps = parse_env("STP_FPS", &fps)?;
        }

        if let Some(warmup) = lookup("STP_WARMUP_WINDOWS") {
            self.warmup_windows = parse_env("STP_WARMUP_WINDOWS", &warmup)?;
        }

        if let Some(charts) = lookup("STP_CHARTS") {
            self.charts = parse_chart_list(&charts)?;
        }

        if let Some(format) = lookup("STP_FORMAT") {
            self.image_format = format.parse()?;
        }

        if let Some(width) = lookup("STP_CHART_WIDTH") {
            self.chart_width = parse_env("STP_CHART_WIDTH", &width)?;
        }

        if let Some(height) = lookup("STP_CHART_HEIGHT") {
            self.chart_height = parse_env("STP_CHART_HEIGHT", &height)?;
        }

        if let Some(label) = lookup("STP_LABEL") {
            self.series_label = label;
        }

        if let Some(format) = lookup("STP_LOG_FORMAT") {
            self.log_format = format.trim().parse()?;
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = parse_env("ENABLE_COLOR", &enable_color)?;
        }

        Ok(())
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))
}

/// Parse a comma-separated chart list such as `encoding,rtt`
pub fn parse_chart_list(value: &str) -> Result<Vec<ChartKind>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

// Default value functions for serde
fn default_output_dir() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_OUTPUT_DIR)
}

fn default_fps() -> u32 {
    crate::defaults::DEFAULT_FPS
}

fn default_warmup_windows() -> usize {
    crate::defaults::DEFAULT_WARMUP_WINDOWS
}

fn default_chart_width() -> u32 {
    crate::defaults::DEFAULT_CHART_SIZE.0
}

fn default_chart_height() -> u32 {
    crate::defaults::DEFAULT_CHART_SIZE.1
}

fn default_series_label() -> String {
    crate::defaults::DEFAULT_SERIES_LABEL.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
