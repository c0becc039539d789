//! Run report: what was rendered, what was skipped, and the per-chart statistics

use crate::{
    error::{ErrorContext, Result},
    stats::SeriesSummary,
    types::ChartKind,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A chart that was written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub path: PathBuf,
    /// Unit of the plotted values
    pub unit: String,
    pub summary: SeriesSummary,
}

/// A chart that was requested but not produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedChart {
    pub kind: ChartKind,
    pub reason: String,
}

/// Outcome of one plotting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    pub fps: u32,
    pub output_dir: PathBuf,
    pub charts: Vec<ChartOutcome>,
    pub skipped: Vec<SkippedChart>,
}

impl RunReport {
    pub fn new(session_id: impl Into<String>, fps: u32, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_id: session_id.into(),
            generated_at: Utc::now(),
            fps,
            output_dir: output_dir.into(),
            charts: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_chart(&mut self, outcome: ChartOutcome) {
        self.charts.push(outcome);
    }

    pub fn record_skip(&mut self, kind: ChartKind, reason: impl Into<String>) {
        self.skipped.push(SkippedChart {
            kind,
            reason: reason.into(),
        });
    }

    /// Number of charts written
    pub fn rendered(&self) -> usize {
        self.charts.len()
    }

    /// Outcome for a chart kind, if it was rendered
    pub fn chart(&self, kind: ChartKind) -> Option<&ChartOutcome> {
        self.charts.iter().find(|c| c.kind == kind)
    }

    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as JSON, creating parent directories as needed
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create report directory '{}'", parent.display()))?;
            }
        }

        let json = self.to_json()?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write run report '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> SeriesSummary {
        SeriesSummary {
            windows: 3,
            frames: 72,
            mean: 4.0,
            min: 3.0,
            max: 5.0,
            p50: 4.0,
            p95: 4.9,
            std_dev: 0.8,
        }
    }

    fn report() -> RunReport {
        let mut report = RunReport::new("session", 24, "out");
        report.record_chart(ChartOutcome {
            kind: ChartKind::EncodingLatency,
            path: PathBuf::from("out/encoding_time.png"),
            unit: "ms".to_string(),
            summary: summary(),
        });
        report.record_skip(ChartKind::Throughput, "no complete window after warm-up");
        report
    }

    #[test]
    fn test_report_bookkeeping() {
        let report = report();
        assert_eq!(report.rendered(), 1);
        assert!(report.has_skips());
        assert!(report.chart(ChartKind::EncodingLatency).is_some());
        assert!(report.chart(ChartKind::Throughput).is_none());
    }

    #[test]
    fn test_report_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["fps"], 24);
        assert_eq!(json["charts"][0]["kind"], "encoding_latency");
        assert_eq!(json["charts"][0]["summary"]["frames"], 72);
        assert_eq!(json["skipped"][0]["kind"], "throughput");
    }

    #[test]
    fn test_write_json_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        let report = report();
        report.write_json(&path).unwrap();

        let read: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, report);
    }
}
