use serde::{Deserialize, Serialize};

use crate::error::ApibenchError;

// ---------------------------------------------------------------------------
// SampleSeries
// ---------------------------------------------------------------------------

/// Ordered numeric measurements: elapsed milliseconds for duration metrics,
/// event timestamps (seconds) for rate metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    samples: Vec<f64>,
}

impl SampleSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    pub fn sum(&self) -> f64 {
        self.samples.iter().sum()
    }

    /// Smallest sample, `None` when empty.
    pub fn min(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    /// Largest sample, `None` when empty.
    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }
}

impl From<Vec<f64>> for SampleSeries {
    fn from(samples: Vec<f64>) -> Self {
        Self { samples }
    }
}

impl FromIterator<f64> for SampleSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// MetricKind / MetricSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Arithmetic mean of the samples.
    CentralTendency,
    /// Events per second over the samples' timestamp span.
    Rate,
}

/// A reduced scalar, tagged with how it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetricSummary {
    Mean(f64),
    Rate(f64),
}

impl MetricSummary {
    pub fn value(&self) -> f64 {
        match self {
            MetricSummary::Mean(v) | MetricSummary::Rate(v) => *v,
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            MetricSummary::Mean(_) => MetricKind::CentralTendency,
            MetricSummary::Rate(_) => MetricKind::Rate,
        }
    }
}

impl std::fmt::Display for MetricSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricSummary::Mean(v) => write!(f, "{v:.4}"),
            MetricSummary::Rate(v) => write!(f, "{v:.6}/s"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Reduce a series to a single [`MetricSummary`].
///
/// `CentralTendency` fails with [`ApibenchError::EmptySeries`] on an empty
/// series. `Rate` never fails: a zero (or empty) timestamp span yields `0`.
pub fn summarize(series: &SampleSeries, kind: MetricKind) -> Result<MetricSummary, ApibenchError> {
    match kind {
        MetricKind::CentralTendency => {
            if series.is_empty() {
                return Err(ApibenchError::EmptySeries);
            }
            let mean = series.sum() / series.len() as f64;
            // Rounding in the sum can land a hair outside the sample range.
            let mean = match (series.min(), series.max()) {
                (Some(lo), Some(hi)) => mean.max(lo).min(hi),
                _ => mean,
            };
            Ok(MetricSummary::Mean(mean))
        }
        MetricKind::Rate => {
            let span = match (series.min(), series.max()) {
                (Some(lo), Some(hi)) => hi - lo,
                _ => 0.0,
            };
            let rate = if span > 0.0 {
                series.len() as f64 / span
            } else {
                0.0
            };
            Ok(MetricSummary::Rate(rate))
        }
    }
}

pub const BYTES_PER_KILOBYTE: f64 = 1024.0;
pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

pub fn bytes_to_kilobytes(total_bytes: f64) -> f64 {
    total_bytes / BYTES_PER_KILOBYTE
}

pub fn bytes_to_megabytes(total_bytes: f64) -> f64 {
    total_bytes / BYTES_PER_MEGABYTE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> SampleSeries {
        values.iter().copied().collect()
    }

    // -----------------------------------------------------------------------
    // SampleSeries
    // -----------------------------------------------------------------------

    #[test]
    fn min_max_of_empty_series_are_none() {
        let s = SampleSeries::new();
        assert!(s.min().is_none());
        assert!(s.max().is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn min_max_ignore_insertion_order() {
        let s = series(&[4.0, 1.5, 9.25, 3.0]);
        assert_eq!(s.min(), Some(1.5));
        assert_eq!(s.max(), Some(9.25));
        assert_eq!(s.len(), 4);
    }

    // -----------------------------------------------------------------------
    // CentralTendency
    // -----------------------------------------------------------------------

    #[test]
    fn mean_of_samples() {
        let summary = summarize(&series(&[10.0, 20.0, 30.0]), MetricKind::CentralTendency).unwrap();
        assert_eq!(summary, MetricSummary::Mean(20.0));
    }

    #[test]
    fn mean_of_empty_series_fails() {
        let err = summarize(&SampleSeries::new(), MetricKind::CentralTendency).unwrap_err();
        assert!(matches!(err, ApibenchError::EmptySeries));
    }

    #[test]
    fn mean_lies_between_min_and_max() {
        let cases: [&[f64]; 5] = [
            &[1.0],
            &[0.3, 0.1, 0.2],
            &[1e-3, 5e3, 17.0, 17.0],
            &[250.0, 250.0, 250.0],
            &[0.1, 0.1, 0.1],
        ];
        for values in cases {
            let s = series(values);
            let mean = summarize(&s, MetricKind::CentralTendency).unwrap().value();
            assert!(s.min().unwrap() <= mean, "{values:?}");
            assert!(mean <= s.max().unwrap(), "{values:?}");
        }
    }

    #[test]
    fn mean_of_constant_inexact_series_equals_the_sample() {
        let s = series(&[0.1, 0.1, 0.1]);
        let mean = summarize(&s, MetricKind::CentralTendency).unwrap();
        assert_eq!(mean, MetricSummary::Mean(0.1));
    }

    // -----------------------------------------------------------------------
    // Rate
    // -----------------------------------------------------------------------

    #[test]
    fn rate_is_count_over_span() {
        // 5 events across 2 seconds.
        let s = series(&[100.0, 100.5, 101.0, 101.5, 102.0]);
        let summary = summarize(&s, MetricKind::Rate).unwrap();
        assert_eq!(summary, MetricSummary::Rate(2.5));
    }

    #[test]
    fn rate_with_zero_span_is_zero() {
        let s = series(&[1_700_000_000.0; 4]);
        assert_eq!(summarize(&s, MetricKind::Rate).unwrap(), MetricSummary::Rate(0.0));
    }

    #[test]
    fn rate_of_empty_series_is_zero() {
        assert_eq!(
            summarize(&SampleSeries::new(), MetricKind::Rate).unwrap(),
            MetricSummary::Rate(0.0)
        );
    }

    #[test]
    fn rate_uses_extremes_not_endpoints() {
        let s = series(&[3.0, 1.0, 5.0, 2.0]);
        assert_eq!(summarize(&s, MetricKind::Rate).unwrap().value(), 1.0);
    }

    // -----------------------------------------------------------------------
    // MetricSummary
    // -----------------------------------------------------------------------

    #[test]
    fn summary_kind_tags() {
        assert_eq!(MetricSummary::Mean(1.0).kind(), MetricKind::CentralTendency);
        assert_eq!(MetricSummary::Rate(1.0).kind(), MetricKind::Rate);
    }

    #[test]
    fn summary_display_depends_on_kind() {
        assert_eq!(MetricSummary::Mean(12.5).to_string(), "12.5000");
        assert_eq!(MetricSummary::Rate(3.0).to_string(), "3.000000/s");
    }

    #[test]
    fn summary_serializes_with_kind_tag() {
        let json = serde_json::to_string(&MetricSummary::Rate(2.5)).unwrap();
        assert_eq!(json, r#"{"kind":"rate","value":2.5}"#);
    }

    // -----------------------------------------------------------------------
    // Byte units
    // -----------------------------------------------------------------------

    #[test]
    fn bytes_sent_convert_to_kilobytes() {
        assert_eq!(format!("{:.2}", bytes_to_kilobytes(2048.0)), "2.00");
    }

    #[test]
    fn bytes_received_convert_to_megabytes() {
        assert_eq!(format!("{:.2}", bytes_to_megabytes(3_145_728.0)), "3.00");
    }
}
