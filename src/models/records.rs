//! Frame records and loaded telemetry logs

use crate::types::LogKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One CSV row of a telemetry log (one video frame)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame sequence number
    pub frame_id: u64,

    /// Encoded frame size in bytes
    pub frame_size_bytes: u64,

    /// Event timestamp in microseconds (generation, decodable or ack time)
    pub timestamp_us: u64,

    /// The log's millisecond metric (encode time, decode time or RTT)
    pub metric_ms: f64,
}

/// A fully parsed telemetry log
#[derive(Debug, Clone)]
pub struct TelemetryLog {
    /// Which log layout the rows follow
    pub kind: LogKind,

    /// Where the log was read from
    pub path: PathBuf,

    /// Rows in file order
    pub records: Vec<FrameRecord>,
}

impl TelemetryLog {
    /// Create a log from parsed records
    pub fn new(kind: LogKind, path: impl AsRef<Path>, records: Vec<FrameRecord>) -> Self {
        Self {
            kind,
            path: path.as_ref().to_path_buf(),
            records,
        }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log holds no frames
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The millisecond metric column
    pub fn metric_ms(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.metric_ms).collect()
    }

    /// The frame size column
    pub fn frame_sizes_bytes(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.frame_size_bytes).collect()
    }

    /// Total bytes over all frames
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.frame_size_bytes).sum()
    }

    /// Wall-clock span between the first and last timestamp
    pub fn duration_us(&self) -> u64 {
        let min = self.records.iter().map(|r| r.timestamp_us).min();
        let max = self.records.iter().map(|r| r.timestamp_us).max();
        match (min, max) {
            (Some(min), Some(max)) => max - min,
            _ => 0,
        }
    }

    /// Frames whose ids are not strictly increasing relative to their predecessor
    pub fn out_of_order_frames(&self) -> usize {
        self.records
            .windows(2)
            .filter(|pair| pair[1].frame_id <= pair[0].frame_id)
            .count()
    }
}
