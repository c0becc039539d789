//! Structured logging system for the telemetry plotter
//!
//! This module provides:
//! - Structured logging with multiple levels and contexts
//! - Debug mode detailed tracing
//! - Stage timing logging for the load / aggregate / render pipeline
//! - Error event logging with correlation IDs
//! - JSON structured output for integration with log aggregators
//!
//! Diagnostics go to stderr so that stdout only carries the run report.

use crate::error::{AppError, Result};
use crate::models::{Config, TelemetryLog};
use crate::stats::SeriesSummary;
use crate::types::ChartKind;
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
    /// Fatal level - severe error events that cause application termination
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Terminal color for the level tag
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::White,
            LogLevel::Debug => Color::Cyan,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Fatal => Color::Magenta,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    /// File and line information
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    /// Source file name
    pub file: String,
    /// Line number
    pub line: u32,
    /// Module path
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format
    #[default]
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(AppError::parse(format!("Invalid log format: {} (expected console, json or compact)", s))),
        }
    }
}

/// Run-wide fields stamped on every entry
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    chart: Option<ChartKind>,
}

/// Logger implementation with multiple output formats
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Whether to include location information
    include_location: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Shared context storage
    context: Arc<RwLock<LogContext>>,
    /// Formatted lines are collected here instead of stderr when set
    capture: Option<Arc<Mutex<Vec<String>>>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
            capture: None,
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: config.log_format,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
            capture: None,
        }
    }

    /// Collect formatted lines in memory instead of writing them
    pub fn capture_output(&mut self) -> Arc<Mutex<Vec<String>>> {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        self.capture = Some(buffer.clone());
        buffer
    }

    /// Logger name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set output format
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Enable or disable colored output
    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    /// Set session correlation ID
    pub fn set_session_id(&self, session_id: String) {
        if let Ok(mut context) = self.context.write() {
            context.session_id = Some(session_id);
        }
    }

    /// Tag subsequent entries with the chart being processed
    pub fn set_chart(&self, chart: Option<ChartKind>) {
        if let Ok(mut context) = self.context.write() {
            context.chart = chart;
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write log entry to output
    fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        if let Ok(context) = self.context.read() {
            if let Some(session_id) = &context.session_id {
                entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
            }
            if let Some(chart) = context.chart {
                if let Ok(value) = serde_json::to_value(chart) {
                    entry.fields.entry("chart".to_string()).or_insert(value);
                }
            }
        }

        let output = self.format_entry(&entry);

        match &self.capture {
            Some(buffer) => {
                if let Ok(mut lines) = buffer.lock() {
                    lines.push(output);
                }
            }
            None => {
                let _ = writeln!(io::stderr(), "{}", output);
            }
        }
    }

    /// Format an entry in the configured format
    fn format_entry(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
            LogFormat::Compact => self.format_compact(entry),
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let padded = format!("{:>5}", level_str);
        let formatted_level = if self.use_color {
            padded.color(entry.level.color()).to_string()
        } else {
            padded
        };

        let mut output = format!("{} {} [{}] {}",
            timestamp,
            formatted_level,
            entry.logger,
            entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            let short = correlation_id.get(..8).unwrap_or(correlation_id);
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields_str.sort();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add location information
    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Add series statistics
    pub fn summary(self, summary: &SeriesSummary) -> Self {
        self.field("windows", summary.windows)
            .field("frames", summary.frames)
            .field("mean", summary.mean)
            .field("min", summary.min)
            .field("max", summary.max)
            .field("p95", summary.p95)
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }
}

/// Times pipeline stages and logs each duration at debug level
pub struct StageTimer {
    logger: Logger,
    stages: Vec<(String, Duration)>,
}

impl StageTimer {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PERF".to_string(), config),
            stages: Vec::new(),
        }
    }

    /// Run `work` as the named stage; the duration is recorded even when it fails
    pub fn time<T>(&mut self, stage: &str, work: impl FnOnce() -> Result<T>) -> Result<T> {
        let started = Instant::now();
        let result = work();
        let elapsed = started.elapsed();

        self.logger.debug(&format!("Stage {} took {:.1}ms", stage, elapsed.as_secs_f64() * 1000.0))
            .field("stage", stage)
            .field("duration_us", elapsed.as_micros() as u64)
            .field("success", result.is_ok())
            .log();

        self.stages.push((stage.to_string(), elapsed));
        result
    }

    /// Stages timed so far, in order
    pub fn stages(&self) -> &[(String, Duration)] {
        &self.stages
    }

    /// Sum of all recorded stage durations
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|(_, d)| *d).sum()
    }
}

/// Logger for pipeline events (logs loaded, charts rendered or skipped)
pub struct PipelineLogger {
    logger: Logger,
}

impl PipelineLogger {
    /// Create a new pipeline logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PIPE".to_string(), config),
        }
    }

    /// Wrap an existing logger
    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Underlying logger
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Log a parsed telemetry log
    pub fn log_loaded(&self, log: &TelemetryLog) {
        self.logger.info(&format!("Loaded {} log '{}' ({} frames)", log.kind, log.path.display(), log.len()))
            .field("log", log.kind)
            .field("path", log.path.display().to_string())
            .field("frames", log.len())
            .field("duration_us", log.duration_us())
            .log();

        let out_of_order = log.out_of_order_frames();
        if out_of_order > 0 {
            self.logger.warn(&format!("{} log has {} out-of-order frame id(s)", log.kind, out_of_order))
                .field("log", log.kind)
                .field("out_of_order", out_of_order)
                .log();
        }
    }

    /// Log a rendered chart
    pub fn log_rendered(&self, kind: ChartKind, path: &Path, summary: &SeriesSummary) {
        self.logger.info(&format!("Rendered {} chart to {}", kind, path.display()))
            .field("chart", kind)
            .field("path", path.display().to_string())
            .summary(summary)
            .log();
    }

    /// Log a chart that was not produced
    pub fn log_skipped(&self, kind: ChartKind, reason: &str) {
        self.logger.warn(&format!("Skipped {} chart: {}", kind, reason))
            .field("chart", kind)
            .field("reason", reason)
            .log();
    }
}

/// Error event logger with enhanced context
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    /// Create a new error event logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("ERR".to_string(), config),
        }
    }

    /// Log an application error with full context
    pub fn log_error(&self, error: &AppError, context: Option<&str>, correlation_id: Option<&str>) {
        let message = if let Some(ctx) = context {
            format!("{}: {}", ctx, error)
        } else {
            error.to_string()
        };

        let mut builder = self.logger.error(&message)
            .error_info(error);

        if let Some(id) = correlation_id {
            builder = builder.correlation_id(id);
        }

        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }

        builder.log();
    }
}

/// Global logger factory and management
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone());
        logger
    }

    /// Create a stage timer
    pub fn create_stage_timer(&self) -> StageTimer {
        let timer = StageTimer::new(&self.config);
        timer.logger.set_session_id(self.session_id.clone());
        timer
    }

    /// Create a pipeline logger
    pub fn create_pipeline_logger(&self) -> PipelineLogger {
        PipelineLogger::from_logger(self.create_logger("PIPE"))
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Convenience macros for logging with location information
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FrameRecord;
    use crate::types::LogKind;
    use std::str::FromStr;

    fn captured(logger: &mut Logger) -> Arc<Mutex<Vec<String>>> {
        logger.set_color(false);
        logger.capture_output()
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::default(), LogFormat::Console);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_logger_with_config() {
        let config = Config {
            debug: true,
            verbose: true,
            enable_color: false,
            ..Default::default()
        };

        let logger = Logger::with_config("TEST".to_string(), &config);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert!(!logger.use_color);
        assert!(logger.include_location);

        let quiet = Logger::with_config("TEST".to_string(), &Config::default());
        assert_eq!(quiet.min_level, LogLevel::Warn);
    }

    #[test]
    fn test_would_log() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_level(LogLevel::Warn);

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Fatal));
    }

    #[test]
    fn test_console_output_with_fields_and_session() {
        let mut logger = Logger::new("TEST".to_string());
        let lines = captured(&mut logger);
        logger.set_session_id("session-1".to_string());

        logger.info("loaded").field("frames", 48).log();
        logger.debug("hidden").log();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO [TEST] loaded"));
        assert!(lines[0].contains("frames=48"));
        assert!(lines[0].contains("session_id=\"session-1\""));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let mut logger = Logger::new("JSON".to_string());
        logger.set_format(LogFormat::Json);
        let lines = captured(&mut logger);

        logger.warn("skipped").field("chart", ChartKind::RoundTripTime).log();

        let lines = lines.lock().unwrap();
        let entry: LogEntry = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.fields["chart"], serde_json::json!("round_trip_time"));
    }

    #[test]
    fn test_compact_output() {
        let mut logger = Logger::new("C".to_string());
        logger.set_format(LogFormat::Compact);
        let lines = captured(&mut logger);

        logger.error("boom").log();
        assert!(lines.lock().unwrap()[0].ends_with("E C: boom"));
    }

    #[test]
    fn test_chart_context_tags_entries() {
        let mut logger = Logger::new("TEST".to_string());
        let lines = captured(&mut logger);

        logger.set_chart(Some(ChartKind::Throughput));
        logger.info("aggregated").log();
        logger.info("explicit").field("chart", "rtt").log();
        logger.set_chart(None);
        logger.info("after").log();

        let lines = lines.lock().unwrap();
        assert!(lines[0].contains("chart=\"throughput\""));
        assert!(lines[0].contains("aggregated"));
        assert!(lines[1].contains("chart=\"rtt\""));
        assert!(!lines[2].contains("chart="));
    }

    #[test]
    fn test_location_macro() {
        let mut logger = Logger::new("LOC".to_string());
        logger.include_location = true;
        let lines = captured(&mut logger);

        log_info!(logger, "value is {}", 42);
        let lines = lines.lock().unwrap();
        assert!(lines[0].contains("value is 42"));
        assert!(lines[0].contains("logging.rs"));
    }

    #[test]
    fn test_pipeline_logger_warns_on_out_of_order_frames() {
        let config = Config { verbose: true, enable_color: false, ..Default::default() };
        let mut logger = Logger::with_config("PIPE".to_string(), &config);
        let lines = logger.capture_output();
        let pipeline = PipelineLogger::from_logger(logger);

        let record = |frame_id| FrameRecord { frame_id, frame_size_bytes: 1, timestamp_us: 0, metric_ms: 1.0 };
        let log = TelemetryLog::new(LogKind::Decoder, "d.csv", vec![record(1), record(0)]);
        pipeline.log_loaded(&log);

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Loaded decoder log"));
        assert!(lines[1].contains("out-of-order"));
    }

    #[test]
    fn test_stage_timer_records_failures_too() {
        let mut timer = StageTimer::new(&Config::default());

        assert_eq!(timer.time("load", || Ok(3)).unwrap(), 3);
        let failed: Result<()> = timer.time("render:rtt", || Err(AppError::render("no backend")));
        assert!(failed.is_err());

        let names: Vec<&str> = timer.stages().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["load", "render:rtt"]);
        assert!(timer.total() >= timer.stages()[0].1);
    }

    #[test]
    fn test_logger_factory() {
        let factory = LoggerFactory::new(Config::default());
        let logger = factory.create_logger("TEST");
        assert_eq!(logger.name(), "TEST");
        assert!(!factory.session_id().is_empty());
        assert_eq!(factory.create_pipeline_logger().logger().name(), "PIPE");
    }

    #[test]
    fn test_log_entry_serialization() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Test message".to_string(),
            logger: "TEST".to_string(),
            correlation_id: Some("test-id".to_string()),
            fields: HashMap::new(),
            location: None,
        };

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.message, "Test message");
        assert_eq!(deserialized.level, LogLevel::Info);
    }
}
