//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Telemetry log variants written by the streaming pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Per-frame encoder statistics written by the sender
    Encoder,
    /// Per-frame decoder statistics written by the receiver
    Decoder,
    /// Per-frame acknowledgement round-trip times written by the sender
    Rtt,
}

impl LogKind {
    /// Every log row carries exactly this many fields
    pub const COLUMNS: usize = 4;

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            LogKind::Encoder => "encoder",
            LogKind::Decoder => "decoder",
            LogKind::Rtt => "rtt",
        }
    }

    /// Number of fields expected on every row
    pub fn expected_columns(&self) -> usize {
        Self::COLUMNS
    }

    /// Column names in file order
    pub fn column_names(&self) -> [&'static str; 4] {
        match self {
            LogKind::Encoder => [
                "frame_id",
                "frame_size_bytes",
                "frame_generation_timestamp_us",
                "encode_time_ms",
            ],
            LogKind::Decoder => [
                "frame_id",
                "frame_size_bytes",
                "frame_decodable_timestamp_us",
                "decode_time_ms",
            ],
            LogKind::Rtt => [
                "frame_id",
                "frame_size_bytes",
                "ack_timestamp_us",
                "rtt_ms",
            ],
        }
    }

    /// Index of the millisecond metric column
    pub fn metric_column(&self) -> usize {
        3
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the per-frame values of one window are reduced to a single point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Window total divided by the number of frames in the window
    Mean,
    /// Window total as-is
    Sum,
}

/// Charts produced from the telemetry logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Mean encode time per second of video
    EncodingLatency,
    /// Mean decode time per second of video
    DecodingLatency,
    /// Received megabits per second of video
    Throughput,
    /// Mean acknowledgement round-trip time per second of video
    RoundTripTime,
}

impl ChartKind {
    /// All charts in rendering order
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Throughput,
        ChartKind::EncodingLatency,
        ChartKind::DecodingLatency,
        ChartKind::RoundTripTime,
    ];

    /// Short name used on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            ChartKind::EncodingLatency => "encoding",
            ChartKind::DecodingLatency => "decoding",
            ChartKind::Throughput => "throughput",
            ChartKind::RoundTripTime => "rtt",
        }
    }

    /// Log the chart is computed from
    pub fn source(&self) -> LogKind {
        match self {
            ChartKind::EncodingLatency => LogKind::Encoder,
            ChartKind::DecodingLatency | ChartKind::Throughput => LogKind::Decoder,
            ChartKind::RoundTripTime => LogKind::Rtt,
        }
    }

    /// Output file name without extension
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::EncodingLatency => "encoding_time",
            ChartKind::DecodingLatency => "decoding_time",
            ChartKind::Throughput => "throughput",
            ChartKind::RoundTripTime => "rtt",
        }
    }

    /// Chart caption; throughput is drawn with a legend instead
    pub fn title(&self) -> Option<&'static str> {
        match self {
            ChartKind::EncodingLatency => Some("Encoding Latency"),
            ChartKind::DecodingLatency => Some("Decoding Latency"),
            ChartKind::Throughput => None,
            ChartKind::RoundTripTime => Some("Round-Trip Time"),
        }
    }

    /// Y axis description
    pub fn y_label(&self) -> &'static str {
        match self {
            ChartKind::EncodingLatency | ChartKind::DecodingLatency => "Latency (ms)",
            ChartKind::Throughput => "Network Throughput (Mbps)",
            ChartKind::RoundTripTime => "RTT (ms)",
        }
    }

    /// Unit of the plotted value, for reports
    pub fn unit(&self) -> &'static str {
        match self {
            ChartKind::Throughput => "Mbps",
            _ => "ms",
        }
    }

    /// Window reduction
    pub fn aggregation(&self) -> Aggregation {
        match self {
            ChartKind::Throughput => Aggregation::Sum,
            _ => Aggregation::Mean,
        }
    }

    /// Whether leading warm-up windows are dropped
    pub fn skips_warmup(&self) -> bool {
        matches!(self, ChartKind::Throughput)
    }

    /// Per-frame value plotted for a record
    pub fn frame_value(&self, record: &crate::models::FrameRecord) -> f64 {
        match self {
            // bytes -> megabits
            ChartKind::Throughput => record.frame_size_bytes as f64 * 8.0 / 1_000_000.0,
            _ => record.metric_ms,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for ChartKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "encoding" | "encoding_time" | "encode" => Ok(ChartKind::EncodingLatency),
            "decoding" | "decoding_time" | "decode" => Ok(ChartKind::DecodingLatency),
            "throughput" | "bitrate" => Ok(ChartKind::Throughput),
            "rtt" | "round_trip_time" => Ok(ChartKind::RoundTripTime),
            other => Err(AppError::validation(format!(
                "Unknown chart '{}' (expected one of: encoding, decoding, throughput, rtt)",
                other
            ))),
        }
    }
}

/// Image encoding for rendered charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(AppError::validation(format!(
                "Unknown image format '{}' (expected png or svg)",
                other
            ))),
        }
    }
}
