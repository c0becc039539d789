//! Window aggregation and per-series statistics
//!
//! Per-frame metrics are reduced to one point per window of `fps` frames,
//! i.e. one point per second of video at a fixed frame rate. Window totals
//! are taken as differences of the running (prefix) sum at the window
//! boundaries, so each frame is added exactly once regardless of the window
//! size.

use crate::{
    error::{AppError, Result},
    models::{Config, TimeSeries},
    types::{Aggregation, ChartKind},
};
use serde::{Deserialize, Serialize};

/// What to do with a trailing window that has fewer than `window` frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialWindow {
    /// Emit it with the frames it has
    Keep,
    /// Discard it
    Drop,
}

/// Sum of one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowTotal {
    /// Zero-based window index, counted from frame 0
    pub index: usize,
    /// Sum of the metric over the window's frames
    pub total: f64,
    /// Frames in the window
    pub frames: usize,
}

/// Running sum: element `i` is `values[0] + .. + values[i]`
pub fn prefix_sums(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Per-window totals over windows `[k*window, (k+1)*window)`
pub fn window_totals(values: &[f64], window: usize, partial: PartialWindow) -> Result<Vec<WindowTotal>> {
    if window == 0 {
        return Err(AppError::statistics("Window size must be greater than 0"));
    }

    let sums = prefix_sums(values);
    let mut totals = Vec::with_capacity(values.len() / window + 1);
    let mut start = 0;

    while start < values.len() {
        let end = (start + window).min(values.len());
        let frames = end - start;
        if frames < window && partial == PartialWindow::Drop {
            break;
        }

        let upper = sums[end - 1];
        let lower = if start == 0 { 0.0 } else { sums[start - 1] };
        totals.push(WindowTotal {
            index: totals.len(),
            total: upper - lower,
            frames,
        });

        start = end;
    }

    Ok(totals)
}

/// Turns per-frame values into a per-window time series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAggregator {
    window_frames: usize,
    fps: u32,
    aggregation: Aggregation,
    skip_windows: usize,
    partial: PartialWindow,
}

impl WindowAggregator {
    /// One window per second of video; partial trailing windows are kept for
    /// means and dropped for sums
    pub fn new(fps: u32, aggregation: Aggregation) -> Self {
        let partial = match aggregation {
            Aggregation::Mean => PartialWindow::Keep,
            Aggregation::Sum => PartialWindow::Drop,
        };

        Self {
            window_frames: fps as usize,
            fps,
            aggregation,
            skip_windows: 0,
            partial,
        }
    }

    /// Aggregator configured for a chart
    pub fn for_chart(kind: ChartKind, config: &Config) -> Self {
        let aggregator = Self::new(config.fps, kind.aggregation());
        if kind.skips_warmup() {
            aggregator.with_skip_windows(config.warmup_windows)
        } else {
            aggregator
        }
    }

    /// Drop this many leading windows; the time axis restarts at zero afterwards
    pub fn with_skip_windows(mut self, skip_windows: usize) -> Self {
        self.skip_windows = skip_windows;
        self
    }

    /// Override the number of frames per window
    pub fn with_window_frames(mut self, window_frames: usize) -> Self {
        self.window_frames = window_frames;
        self
    }

    pub fn window_frames(&self) -> usize {
        self.window_frames
    }

    pub fn skip_windows(&self) -> usize {
        self.skip_windows
    }

    /// Seconds of video covered by one window
    pub fn window_seconds(&self) -> f64 {
        if self.fps == 0 {
            0.0
        } else {
            self.window_frames as f64 / self.fps as f64
        }
    }

    /// Aggregate per-frame values into a labelled series
    pub fn aggregate(&self, label: &str, values: &[f64]) -> Result<TimeSeries> {
        if self.fps == 0 {
            return Err(AppError::statistics("FPS must be greater than 0"));
        }

        let totals = window_totals(values, self.window_frames, self.partial)?;
        let step = self.window_seconds();
        let mut series = TimeSeries::new(label);

        for (i, window) in totals.iter().skip(self.skip_windows).enumerate() {
            let value = match self.aggregation {
                Aggregation::Mean => window.total / window.frames as f64,
                Aggregation::Sum => window.total,
            };
            series.push(i as f64 * step, value, window.frames);
        }

        Ok(series)
    }
}

/// Descriptive statistics of an aggregated series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of points (windows)
    pub windows: usize,
    /// Frames that contributed to the points
    pub frames: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p95: f64,
    pub std_dev: f64,
}

impl SeriesSummary {
    /// Summarize a series; `None` when it has no points
    pub fn from_series(series: &TimeSeries) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let values = series.values();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(Self {
            windows: values.len(),
            frames: series.points.iter().map(|p| p.frames).sum(),
            mean,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
            std_dev: standard_deviation(&values, mean),
        })
    }
}

/// Linear-interpolated percentile of an ascending slice
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}

/// Population standard deviation
fn standard_deviation(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
