//! Colored formatter implementation with terminal color support
//!
//! This module provides a colored output formatter that uses ANSI colors
//! for the run summary and per-chart statistics.

use crate::{
    error::Result,
    report::{RunReport, SkippedChart},
};
use super::formatter::{fmt_error, format_value, FormattingOptions, OutputFormatter, PlainFormatter};
use std::fmt::Write as _;
use colored::*;

/// Latency relative to the frame interval, for color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyLevel {
    /// Fits within one frame interval
    WithinFrame,
    /// Between one and two frame intervals
    Lagging,
    /// More than two frame intervals
    Stalling,
}

impl LatencyLevel {
    /// Classify a millisecond latency against the frame interval at `fps`
    pub fn classify(latency_ms: f64, fps: u32) -> Self {
        let frame_ms = if fps == 0 { f64::INFINITY } else { 1000.0 / fps as f64 };
        if latency_ms <= frame_ms {
            Self::WithinFrame
        } else if latency_ms <= 2.0 * frame_ms {
            Self::Lagging
        } else {
            Self::Stalling
        }
    }

    /// Get color for this level
    pub fn color(&self) -> Color {
        match self {
            Self::WithinFrame => Color::Green,
            Self::Lagging => Color::Yellow,
            Self::Stalling => Color::Red,
        }
    }

    /// Get descriptive text
    pub fn description(&self) -> &'static str {
        match self {
            Self::WithinFrame => "within frame",
            Self::Lagging => "lagging",
            Self::Stalling => "stalling",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Create a colored section header
    fn create_section_header(&self, title: &str) -> String {
        if self.options.enable_color {
            title.bold().color(self.color_scheme.header).to_string()
        } else {
            title.to_string()
        }
    }

    /// Mean value colored by frame-interval budget; non-latency units use the info color
    fn format_mean_colored(&self, value: f64, unit: &str, fps: u32) -> String {
        let text = format_value(value, unit);
        if unit == "ms" {
            let level = LatencyLevel::classify(value, fps);
            format!("{} ({})", self.colorize(&text, level.color()), level.description())
        } else {
            self.colorize(&text, self.color_scheme.info).to_string()
        }
    }

    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }

    /// Enable or disable colors at runtime
    pub fn set_colors_enabled(&mut self, enabled: bool) {
        self.options.enable_color = enabled && Self::supports_color();
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(fmt_error)?;
        writeln!(output, "  {}  ", self.bold(title).color(self.color_scheme.header)).map_err(fmt_error)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_run_summary(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.create_section_header("Run Summary")).map_err(fmt_error)?;
        if self.options.verbose_mode {
            writeln!(output, "Session:     {}", self.colorize(&report.session_id, self.color_scheme.muted)).map_err(fmt_error)?;
        }
        writeln!(output, "Frame rate:  {} fps", self.colorize(&report.fps.to_string(), self.color_scheme.info)).map_err(fmt_error)?;
        writeln!(output, "Output:      {}", report.output_dir.display()).map_err(fmt_error)?;
        write!(output, "Rendered:    {}", self.colorize(&report.rendered().to_string(), self.color_scheme.success)).map_err(fmt_error)?;

        if report.has_skips() {
            write!(output, "\nSkipped:     {}",
                self.colorize(&report.skipped.len().to_string(), self.color_scheme.warning))
                .map_err(fmt_error)?;
        }

        Ok(output)
    }

    fn format_chart_table(&self, report: &RunReport) -> Result<String> {
        if report.charts.is_empty() {
            return Ok(self.colorize("No charts rendered.", self.color_scheme.muted).to_string());
        }

        let mut output = String::new();
        writeln!(output, "{}", self.create_section_header("Charts")).map_err(fmt_error)?;
        output.push_str(&self.plain_formatter.create_table(
            &self.plain_formatter.chart_table_format(),
            &self.plain_formatter.chart_rows(report),
        )?);

        if self.options.verbose_mode {
            for chart in &report.charts {
                write!(output, "\n  {} mean: {}",
                    self.colorize(&chart.kind.to_string(), self.color_scheme.info),
                    self.format_mean_colored(chart.summary.mean, &chart.unit, report.fps))
                    .map_err(fmt_error)?;
            }
        }

        Ok(output)
    }

    fn format_skipped(&self, skipped: &[SkippedChart]) -> Result<String> {
        let lines: Result<Vec<String>> = skipped
            .iter()
            .map(|chart| self.format_warning(&format!("{} skipped: {}", chart.kind, chart.reason)))
            .collect();
        Ok(lines?.join("\n"))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✗", self.color_scheme.error), self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("!", self.color_scheme.warning), self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✓", self.color_scheme.success), self.colorize(message, self.color_scheme.success)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ChartOutcome;
    use crate::stats::SeriesSummary;
    use crate::types::ChartKind;
    use std::path::PathBuf;

    fn formatter(verbose: bool) -> ColoredFormatter {
        ColoredFormatter::new(FormattingOptions {
            enable_color: false,
            verbose_mode: verbose,
            ..Default::default()
        })
    }

    fn report() -> RunReport {
        let mut report = RunReport::new("session", 30, "out");
        report.record_chart(ChartOutcome {
            kind: ChartKind::DecodingLatency,
            path: PathBuf::from("out/decoding_time.png"),
            unit: "ms".to_string(),
            summary: SeriesSummary {
                windows: 4,
                frames: 120,
                mean: 50.0,
                min: 40.0,
                max: 60.0,
                p50: 50.0,
                p95: 59.0,
                std_dev: 7.0,
            },
        });
        report
    }

    #[test]
    fn test_latency_level_against_frame_interval() {
        assert_eq!(LatencyLevel::classify(10.0, 60), LatencyLevel::WithinFrame);
        assert_eq!(LatencyLevel::classify(30.0, 60), LatencyLevel::Lagging);
        assert_eq!(LatencyLevel::classify(50.0, 30), LatencyLevel::Lagging);
        assert_eq!(LatencyLevel::classify(70.0, 30), LatencyLevel::Stalling);
        assert_eq!(LatencyLevel::classify(1e6, 0), LatencyLevel::WithinFrame);
    }

    #[test]
    fn test_color_scheme_default() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.success, Color::Green);
        assert_eq!(scheme.error, Color::Red);
    }

    #[test]
    fn test_chart_table_without_color() {
        let table = formatter(false).format_chart_table(&report()).unwrap();
        assert!(table.starts_with("Charts\n"));
        assert!(table.contains("decoding"));
        assert!(table.contains("50.00 ms"));
        assert!(!table.contains("lagging"));
    }

    #[test]
    fn test_verbose_table_classifies_mean() {
        let table = formatter(true).format_chart_table(&report()).unwrap();
        assert!(table.contains("decoding mean: 50.00 ms (lagging)"));
    }

    #[test]
    fn test_summary_hides_skips_when_none() {
        let summary = formatter(false).format_run_summary(&report()).unwrap();
        assert!(summary.contains("Rendered:    1"));
        assert!(!summary.contains("Skipped"));
    }

    #[test]
    fn test_messages() {
        let f = formatter(false);
        assert_eq!(f.format_success("done").unwrap(), "✓ done");
        assert_eq!(f.format_warning("careful").unwrap(), "! careful");
        let skipped = vec![SkippedChart { kind: ChartKind::Throughput, reason: "short".to_string() }];
        assert_eq!(f.format_skipped(&skipped).unwrap(), "! throughput skipped: short");
    }
}
