//! Load → aggregate → render
//!
//! Each configured log is read once; every selected chart derives its
//! per-frame values from its source log, reduces them to one point per
//! window and hands the series to a [`ChartRenderer`].

use crate::{
    log_debug,
    charts::{ChartRenderer, ChartSpec},
    error::{AppError, ErrorContext, Result},
    logging::{LoggerFactory, PipelineLogger, StageTimer},
    models::{Config, TelemetryLog, TimeSeries},
    report::{ChartOutcome, RunReport},
    stats::{SeriesSummary, WindowAggregator},
    telemetry::TelemetryLoader,
    types::{ChartKind, LogKind},
};
use std::collections::HashMap;
use std::fs;

/// A chart's aggregated series before rendering
#[derive(Debug, Clone)]
pub struct PreparedChart {
    pub kind: ChartKind,
    pub series: TimeSeries,
    pub spec: ChartSpec,
}

/// Drives one plotting run
pub struct Pipeline {
    config: Config,
    renderer: Box<dyn ChartRenderer>,
    loggers: LoggerFactory,
    events: PipelineLogger,
}

impl Pipeline {
    /// Create a pipeline for a validated configuration
    pub fn new(config: Config, renderer: Box<dyn ChartRenderer>) -> Self {
        let loggers = LoggerFactory::new(config.clone());
        let events = loggers.create_pipeline_logger();
        Self {
            config,
            renderer,
            loggers,
            events,
        }
    }

    /// Replace the event logger
    pub fn with_event_logger(mut self, events: PipelineLogger) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        self.loggers.session_id()
    }

    /// Run every selected chart and collect the outcome
    pub fn run(&self) -> Result<RunReport> {
        let mut timer = self.loggers.create_stage_timer();
        let charts = self.config.selected_charts();
        if charts.is_empty() {
            return Err(AppError::config("No chart selected"));
        }

        let logs = timer.time("load", || self.load_sources(&charts))?;

        self.ensure_output_dir()?;

        let mut report = RunReport::new(self.session_id(), self.config.fps, &self.config.output_dir);
        for kind in charts {
            self.events.logger().set_chart(Some(kind));
            let outcome = self.run_chart(kind, &logs, &mut report, &mut timer);
            self.events.logger().set_chart(None);
            outcome?;
        }

        if report.rendered() == 0 {
            let reasons: Vec<String> = report
                .skipped
                .iter()
                .map(|s| format!("{}: {}", s.kind, s.reason))
                .collect();
            return Err(AppError::statistics(format!(
                "No chart could be rendered ({})",
                reasons.join("; ")
            )));
        }

        Ok(report)
    }

    /// Aggregate a chart from its loaded source log
    pub fn prepare(&self, kind: ChartKind, log: &TelemetryLog) -> Result<PreparedChart> {
        let values: Vec<f64> = log.records.iter().map(|r| kind.frame_value(r)).collect();
        // Only the throughput chart carries a legend
        let label = match kind {
            ChartKind::Throughput => self.config.series_label.as_str(),
            _ => kind.cli_name(),
        };
        let series = WindowAggregator::for_chart(kind, &self.config)
            .aggregate(label, &values)
            .with_context(|| format!("Aggregating {} chart", kind))?;

        Ok(PreparedChart {
            kind,
            series,
            spec: ChartSpec::for_chart(kind, &self.config),
        })
    }

    fn run_chart(
        &self,
        kind: ChartKind,
        logs: &HashMap<LogKind, TelemetryLog>,
        report: &mut RunReport,
        timer: &mut StageTimer,
    ) -> Result<()> {
        let log = logs
            .get(&kind.source())
            .ok_or_else(|| AppError::internal(format!("{} log was not loaded", kind.source())))?;

        let prepared = self.prepare(kind, log)?;
        log_debug!(
            self.events.logger(),
            "Aggregated {} frames of the {} log into {} window(s) for {}",
            log.len(),
            log.kind,
            prepared.series.len(),
            kind
        );
        let summary = match SeriesSummary::from_series(&prepared.series) {
            Some(summary) => summary,
            None => {
                let reason = empty_reason(kind, log, &self.config);
                self.events.log_skipped(kind, &reason);
                report.record_skip(kind, reason);
                return Ok(());
            }
        };

        let stage = format!("render:{}", kind.cli_name());
        let path = timer.time(&stage, || self.renderer.render(&prepared.series, &prepared.spec))?;

        self.events.log_rendered(kind, &path, &summary);
        report.record_chart(ChartOutcome {
            kind,
            path,
            unit: kind.unit().to_string(),
            summary,
        });
        Ok(())
    }

    fn load_sources(&self, charts: &[ChartKind]) -> Result<HashMap<LogKind, TelemetryLog>> {
        let mut logs = HashMap::new();
        for kind in charts.iter().map(ChartKind::source) {
            if logs.contains_key(&kind) {
                continue;
            }

            let path = self.config.log_path(kind).ok_or_else(|| {
                AppError::config(format!("No {} log configured", kind))
            })?;
            let log = TelemetryLoader::new(kind).load(path)?;
            self.events.log_loaded(&log);
            logs.insert(kind, log);
        }
        Ok(logs)
    }

    fn ensure_output_dir(&self) -> Result<()> {
        let dir = &self.config.output_dir;
        if !dir.is_dir() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        }
        Ok(())
    }
}

fn empty_reason(kind: ChartKind, log: &TelemetryLog, config: &Config) -> String {
    if kind.skips_warmup() {
        format!(
            "{} frame(s) do not fill a complete {}-frame window after {} warm-up window(s)",
            log.len(),
            config.fps,
            config.warmup_windows
        )
    } else {
        format!("{} log has no frames to aggregate", log.kind)
    }
}
