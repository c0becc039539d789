//! Aggregated time series ready for plotting

use serde::{Deserialize, Serialize};

/// One aggregated window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Streaming time in seconds at the start of the window
    pub time_s: f64,
    /// Aggregated value for the window
    pub value: f64,
    /// Number of frames that contributed
    pub frames: usize,
}

/// A named sequence of per-window points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Series label (used for legends)
    pub label: String,
    /// Points in time order
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// Create an empty series
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            points: Vec::new(),
        }
    }

    /// Append a point
    pub fn push(&mut self, time_s: f64, value: f64, frames: usize) {
        self.points.push(SeriesPoint { time_s, value, frames });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values without timestamps
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// `(x, y)` pairs for drawing
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.time_s, p.value)).collect()
    }

    /// Smallest and largest value, `None` for an empty series
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.value);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Time of the last point
    pub fn last_time(&self) -> Option<f64> {
        self.points.last().map(|p| p.time_s)
    }
}
