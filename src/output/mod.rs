//! Output formatting and display system
//!
//! This module provides a flexible output formatting system for run reports,
//! supporting both colored and plain text output with table formatting.

mod formatter;
mod colored;

pub use formatter::{
    format_value,
    Alignment,
    Column,
    FormattingOptions,
    OutputFormatter,
    PlainFormatter,
    RowData,
    TableFormat,
};
pub use colored::{
    ColoredFormatter,
    ColorScheme,
    LatencyLevel,
};

use crate::{error::Result, report::RunReport};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
            max_width: 120,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a console-optimized formatter
    pub fn create_console_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(true, false)
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, true)
    }
}

/// Main output coordinator that handles all report display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter }
    }

    /// Display a complete run report
    pub fn display_report(&self, report: &RunReport) -> Result<String> {
        let mut sections = vec![
            self.formatter.format_header("Stream Telemetry Charts")?,
            self.formatter.format_run_summary(report)?,
            self.formatter.format_chart_table(report)?,
        ];

        if report.has_skips() {
            sections.push(self.formatter.format_skipped(&report.skipped)?);
        }

        sections.push(self.formatter.format_success(&format!(
            "{} chart(s) written to {}",
            report.rendered(),
            report.output_dir.display()
        ))?);

        Ok(sections.join("\n\n"))
    }

    /// Format a warning line
    pub fn display_warning(&self, warning: &str) -> Result<String> {
        self.formatter.format_warning(warning)
    }

    /// Format an error line
    pub fn display_error(&self, error: &str) -> Result<String> {
        self.formatter.format_error(error)
    }
}
