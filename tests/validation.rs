//! Property tests for log parsing and warm-up trimming through the public API
//!
//! Window arithmetic itself is covered next to the aggregator; these check
//! what a caller sees: well-formed rows load field for field, a malformed
//! row is reported by line, and warm-up windows are cut without shifting
//! the remaining values.

use proptest::prelude::*;
use stream_telemetry_plotter::{
    stats::{window_totals, PartialWindow, WindowAggregator},
    telemetry::TelemetryLoader,
    types::{Aggregation, LogKind},
};
use std::path::Path;

fn values_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..500.0, 0..400)
}

proptest! {
    #[test]
    fn warmup_skips_exactly_that_many_windows(values in values_strategy(), fps in 1u32..31, skip in 0usize..5) {
        let full = WindowAggregator::new(fps, Aggregation::Sum).aggregate("p", &values).unwrap();
        let trimmed = WindowAggregator::new(fps, Aggregation::Sum)
            .with_skip_windows(skip)
            .aggregate("p", &values)
            .unwrap();

        prop_assert_eq!(trimmed.len(), full.len().saturating_sub(skip));
        for (kept, original) in trimmed.values().iter().zip(full.values().iter().skip(skip)) {
            prop_assert_eq!(kept, original);
        }
        if let Some((x, _)) = trimmed.xy().first() {
            prop_assert_eq!(*x, 0.0);
        }
    }

    #[test]
    fn loader_accepts_any_well_formed_rows(rows in prop::collection::vec((0u64..1_000_000, 0u64..10_000_000, 0.0f64..1000.0), 1..100)) {
        let csv: String = rows
            .iter()
            .enumerate()
            .map(|(i, (size, ts, ms))| format!("{},{},{},{}\n", i, size, ts, ms))
            .collect();

        let log = TelemetryLoader::new(LogKind::Rtt)
            .from_reader(csv.as_bytes(), Path::new("prop.csv"))
            .unwrap();

        prop_assert_eq!(log.len(), rows.len());
        for (record, (size, ts, ms)) in log.records.iter().zip(&rows) {
            prop_assert_eq!(record.frame_size_bytes, *size);
            prop_assert_eq!(record.timestamp_us, *ts);
            prop_assert_eq!(record.metric_ms, *ms);
        }
    }

    #[test]
    fn loader_rejects_rows_with_wrong_width(extra in 1usize..4, line in 0usize..20) {
        let mut csv = String::new();
        for i in 0..20 {
            if i == line {
                let cols = vec!["1"; 4 + extra].join(",");
                csv.push_str(&cols);
                csv.push('\n');
            } else {
                csv.push_str(&format!("{},10,{},1.0\n", i, i * 100));
            }
        }

        let err = TelemetryLoader::new(LogKind::Encoder)
            .from_reader(csv.as_bytes(), Path::new("prop.csv"))
            .unwrap_err();
        prop_assert_eq!(err.exit_code(), 1);
        let expected = format!("line {} has {} column(s)", line + 1, 4 + extra);
        prop_assert!(err.to_string().contains(&expected));
    }
}

#[test]
fn zero_window_is_rejected() {
    assert!(window_totals(&[1.0, 2.0], 0, PartialWindow::Keep).is_err());
}

#[test]
fn zero_fps_aggregation_is_rejected() {
    let err = WindowAggregator::new(0, Aggregation::Mean)
        .aggregate("p", &[1.0])
        .unwrap_err();
    assert_eq!(err.exit_code(), 6);
}
