//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    report::{RunReport, SkippedChart},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the run overview (session, fps, output directory, counts)
    fn format_run_summary(&self, report: &RunReport) -> Result<String>;

    /// Format per-chart statistics as a table
    fn format_chart_table(&self, report: &RunReport) -> Result<String>;

    /// Format charts that were not produced
    fn format_skipped(&self, skipped: &[SkippedChart]) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum output width
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_width: 120,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
    /// Show header row
    pub show_header: bool,
    /// Minimum column width
    pub min_column_width: usize,
    /// Maximum column width
    pub max_column_width: usize,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Minimum width
    pub min_width: usize,
    /// Maximum width
    pub max_width: usize,
}

impl Column {
    fn new(header: &str, alignment: Alignment, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Table layout for the per-chart statistics
    pub(crate) fn chart_table_format(&self) -> TableFormat {
        let mut columns = vec![
            Column::new("Chart", Alignment::Left, 10, 20),
            Column::new("Windows", Alignment::Right, 7, 9),
            Column::new("Mean", Alignment::Right, 10, 14),
            Column::new("Min/Max", Alignment::Right, 17, 25),
            Column::new("P95", Alignment::Right, 10, 14),
        ];
        if self.options.verbose_mode {
            columns.push(Column::new("Std Dev", Alignment::Right, 10, 14));
            columns.push(Column::new("Frames", Alignment::Right, 6, 10));
        }
        columns.push(Column::new("File", Alignment::Left, 10, 60));

        TableFormat {
            columns,
            show_borders: self.options.table_borders,
            show_header: true,
            min_column_width: 6,
            max_column_width: 60,
        }
    }

    /// One table row per rendered chart
    pub(crate) fn chart_rows(&self, report: &RunReport) -> Vec<RowData> {
        report
            .charts
            .iter()
            .map(|chart| {
                let s = &chart.summary;
                let mut row = vec![
                    chart.kind.to_string(),
                    s.windows.to_string(),
                    format_value(s.mean, &chart.unit),
                    format!("{}/{}", format_value(s.min, &chart.unit), format_value(s.max, &chart.unit)),
                    format_value(s.p95, &chart.unit),
                ];
                if self.options.verbose_mode {
                    row.push(format_value(s.std_dev, &chart.unit));
                    row.push(s.frames.to_string());
                }
                row.push(chart.path.display().to_string());
                row
            })
            .collect()
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> Result<String> {
        if rows.is_empty() {
            return Ok(String::new());
        }

        let column_widths = self.calculate_column_widths(format, rows);

        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        Ok(output.trim_end().to_string())
    }

    /// Calculate optimal column widths
    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format.columns.len().max(
            rows.iter().map(|r| r.len()).max().unwrap_or(0)
        );

        (0..num_columns)
            .map(|col_idx| {
                let column = format.columns.get(col_idx);
                let mut width = column
                    .map(|c| c.min_width.max(c.header.chars().count()))
                    .unwrap_or(format.min_column_width);

                for row in rows {
                    if let Some(cell) = row.get(col_idx) {
                        width = width.max(cell.chars().count());
                    }
                }

                width.min(column.map(|c| c.max_width).unwrap_or(format.max_column_width))
            })
            .collect()
    }

    /// Create a table row
    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format.columns.get(idx).map(|c| &c.alignment).unwrap_or(&Alignment::Left);
            let padded_cell = align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&padded_cell);
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }
}

/// Align text within specified width, truncating when too long
pub(crate) fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

/// Value with its unit; two decimals for small values, one otherwise
pub fn format_value(value: f64, unit: &str) -> String {
    if value.abs() < 100.0 {
        format!("{:.2} {}", value, unit)
    } else {
        format!("{:.1} {}", value, unit)
    }
}

pub(crate) fn fmt_error(error: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", error))
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border).map_err(fmt_error)?;
        writeln!(output, "  {}  ", title).map_err(fmt_error)?;
        write!(output, "{}", border).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_run_summary(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Run Summary:").map_err(fmt_error)?;
        writeln!(output, "------------").map_err(fmt_error)?;
        if self.options.verbose_mode {
            writeln!(output, "Session:          {}", report.session_id).map_err(fmt_error)?;
            writeln!(output, "Generated:        {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")).map_err(fmt_error)?;
        }
        writeln!(output, "Frame Rate:       {} fps (1 window = {} frames)", report.fps, report.fps).map_err(fmt_error)?;
        writeln!(output, "Output Directory: {}", report.output_dir.display()).map_err(fmt_error)?;
        writeln!(output, "Charts Rendered:  {}", report.rendered()).map_err(fmt_error)?;
        write!(output, "Charts Skipped:   {}", report.skipped.len()).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_chart_table(&self, report: &RunReport) -> Result<String> {
        if report.charts.is_empty() {
            return Ok("No charts rendered.".to_string());
        }

        self.create_table(&self.chart_table_format(), &self.chart_rows(report))
    }

    fn format_skipped(&self, skipped: &[SkippedChart]) -> Result<String> {
        let mut output = String::new();
        for (i, chart) in skipped.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            write!(output, "{}", self.format_warning(&format!("{} skipped: {}", chart.kind, chart.reason))?)
                .map_err(fmt_error)?;
        }
        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
