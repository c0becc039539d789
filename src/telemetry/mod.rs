//! Telemetry log loading
//!
//! The sender and receiver write one header-less CSV row per frame. Every log
//! shares the same four-column layout (see [`LogKind::column_names`]); rows
//! are validated for column count and numeric content before they become
//! [`FrameRecord`]s.

use crate::{
    error::{AppError, ErrorContext, Result},
    models::{FrameRecord, TelemetryLog},
    types::LogKind,
};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads telemetry logs of one kind
#[derive(Debug, Clone, Copy)]
pub struct TelemetryLoader {
    kind: LogKind,
}

impl TelemetryLoader {
    /// Create a loader for a log layout
    pub fn new(kind: LogKind) -> Self {
        Self { kind }
    }

    /// Layout this loader expects
    pub fn kind(&self) -> LogKind {
        self.kind
    }

    /// Load and validate a log file
    pub fn load(&self, path: &Path) -> Result<TelemetryLog> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open {} log '{}'", self.kind, path.display()))?;
        self.from_reader(BufReader::new(file), path)
    }

    /// Load and validate a log from any reader; `source` is only used for messages
    pub fn from_reader<R: Read>(&self, reader: R, source: &Path) -> Result<TelemetryLog> {
        let records = self
            .read_records(reader)
            .map_err(|e| e.prefixed(&format!("{} log '{}'", self.kind, source.display())))?;
        Ok(TelemetryLog::new(self.kind, source, records))
    }

    fn read_records<R: Read>(&self, reader: R) -> Result<Vec<FrameRecord>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let expected = self.kind.expected_columns();
        let mut records = Vec::new();

        for (index, result) in csv_reader.records().enumerate() {
            let row = result?;
            let line = row
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 1);

            if row.len() != expected {
                return Err(AppError::schema(format!(
                    "line {} has {} column(s), expected {} ({})",
                    line,
                    row.len(),
                    expected,
                    self.kind.column_names().join(",")
                )));
            }

            records.push(self.parse_row(&row, line)?);
        }

        if records.is_empty() {
            return Err(AppError::empty_log("no frame rows found"));
        }

        Ok(records)
    }

    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<FrameRecord> {
        let names = self.kind.column_names();
        let metric = self.kind.metric_column();

        let frame_id = parse_count(&row[0], names[0], line)?;
        let frame_size_bytes = parse_count(&row[1], names[1], line)?;
        let timestamp_us = parse_count(&row[2], names[2], line)?;
        let metric_ms = parse_millis(&row[metric], names[metric], line)?;

        Ok(FrameRecord {
            frame_id,
            frame_size_bytes,
            timestamp_us,
            metric_ms,
        })
    }
}

/// Load a log of the given kind from disk
pub fn load_log(kind: LogKind, path: &Path) -> Result<TelemetryLog> {
    TelemetryLoader::new(kind).load(path)
}

/// Non-negative integer field; integral floats such as `12.0` are accepted
fn parse_count(raw: &str, column: &str, line: u64) -> Result<u64> {
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }

    let value: f64 = raw.parse().map_err(|_| invalid_field(raw, column, line, "an integer"))?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(invalid_field(raw, column, line, "a non-negative integer"))
    }
}

/// Non-negative, finite millisecond field
fn parse_millis(raw: &str, column: &str, line: u64) -> Result<f64> {
    let value: f64 = raw.parse().map_err(|_| invalid_field(raw, column, line, "a number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid_field(raw, column, line, "a finite non-negative number"))
    }
}

fn invalid_field(raw: &str, column: &str, line: u64, expected: &str) -> AppError {
    AppError::parse(format!(
        "line {}: column '{}' is '{}', expected {}",
        line, column, raw, expected
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_str(kind: LogKind, content: &str) -> Result<TelemetryLog> {
        TelemetryLoader::new(kind).from_reader(content.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn test_load_decoder_rows() {
        let log = load_str(LogKind::Decoder, "0,1200,1000,2.5\n1,800,42667,3.0\n").unwrap();
        assert_eq!(log.kind, LogKind::Decoder);
        assert_eq!(log.len(), 2);
        assert_eq!(log.records[0].frame_size_bytes, 1200);
        assert_eq!(log.records[1].timestamp_us, 42667);
        assert_eq!(log.metric_ms(), vec![2.5, 3.0]);
    }

    #[test]
    fn test_whitespace_comments_and_blank_lines() {
        let content = "# frame_id,frame_size_bytes,ts_us,encode_time_ms\n 0 , 10 , 5 , 1.5 \n\n1,20,6,2\n";
        let log = load_str(LogKind::Encoder, content).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.records[0].metric_ms, 1.5);
    }

    #[test]
    fn test_integral_floats_accepted() {
        let log = load_str(LogKind::Rtt, "3.0,100.0,2000,12.25\n").unwrap();
        assert_eq!(log.records[0].frame_id, 3);
        assert_eq!(log.records[0].frame_size_bytes, 100);
    }

    #[test]
    fn test_column_count_mismatch_reports_line() {
        let err = load_str(LogKind::Decoder, "0,1,2,3\n1,2,3\n").unwrap_err();
        assert_eq!(err.category(), "SCHEMA");
        let message = err.to_string();
        assert!(message.contains("line 2"), "{}", message);
        assert!(message.contains("3 column(s)"), "{}", message);
    }

    #[test]
    fn test_extra_columns_rejected() {
        let err = load_str(LogKind::Encoder, "0,1,2,3,4\n").unwrap_err();
        assert_eq!(err.category(), "SCHEMA");
    }

    #[test]
    fn test_non_numeric_field() {
        let err = load_str(LogKind::Decoder, "0,abc,2,3\n").unwrap_err();
        assert_eq!(err.category(), "PARSE");
        let message = err.to_string();
        assert!(message.contains("frame_size_bytes"), "{}", message);
        assert!(message.contains("line 1"), "{}", message);
    }

    #[test]
    fn test_fractional_count_rejected() {
        let err = load_str(LogKind::Decoder, "0.5,1,2,3\n").unwrap_err();
        assert_eq!(err.category(), "PARSE");
    }

    #[test]
    fn test_negative_and_nan_metric_rejected() {
        assert!(load_str(LogKind::Rtt, "0,1,2,-3\n").is_err());
        assert!(load_str(LogKind::Rtt, "0,1,2,NaN\n").is_err());
    }

    #[test]
    fn test_empty_log() {
        let err = load_str(LogKind::Encoder, "").unwrap_err();
        assert_eq!(err.category(), "EMPTY");

        let err = load_str(LogKind::Encoder, "# only a comment\n").unwrap_err();
        assert_eq!(err.category(), "EMPTY");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0,1000,0,4.0").unwrap();
        writeln!(file, "1,1000,41666,6.0").unwrap();
        file.flush().unwrap();

        let log = load_log(LogKind::Encoder, file.path()).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.path, file.path());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_log(LogKind::Decoder, Path::new("/nonexistent/decoder.csv")).unwrap_err();
        assert_eq!(err.category(), "IO");
        assert!(err.to_string().contains("decoder log"));
    }
}
