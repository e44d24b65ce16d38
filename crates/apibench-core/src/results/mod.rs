pub mod export;

use serde::{Deserialize, Serialize};

use crate::error::ApibenchError;
use crate::http::TargetConfig;
use crate::stats::{summarize, MetricKind, MetricSummary, SampleSeries};

// ---------------------------------------------------------------------------
// TargetResult: one row of a sweep
// ---------------------------------------------------------------------------

/// Response-time statistics for one target after a sweep.
///
/// Field names match the JSON results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TargetResult {
    pub tag: String,
    pub url: String,
    /// Mean response time (ms).
    pub average_response_time: f64,
    /// Fastest response (ms).
    pub minimum_response_time: f64,
    /// Slowest response (ms).
    pub maximum_response_time: f64,
    /// Number of recorded samples; skipped repetitions are not counted.
    pub num_requests: usize,
}

impl TargetResult {
    /// Reduce a target's recorded samples. Fails with
    /// [`ApibenchError::EmptySeries`] when nothing was recorded.
    pub fn from_series(target: &TargetConfig, series: &SampleSeries) -> Result<Self, ApibenchError> {
        let average = summarize(series, MetricKind::CentralTendency)?.value();
        let (Some(min), Some(max)) = (series.min(), series.max()) else {
            return Err(ApibenchError::EmptySeries);
        };

        Ok(Self {
            tag: target.tag.clone(),
            url: target.url.clone(),
            average_response_time: average,
            minimum_response_time: min,
            maximum_response_time: max,
            num_requests: series.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// RunSummary: one analyzed result file
// ---------------------------------------------------------------------------

/// Summary of one load-test result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunSummary {
    /// Identifying label, normally the source file name.
    pub key: String,
    /// Total bytes received, in MB.
    pub data_received: f64,
    /// Total bytes sent, in kB.
    pub data_sent: f64,
    /// Mean request duration (ms).
    pub http_req_duration: MetricSummary,
    /// Requests per second over the run.
    pub rps: MetricSummary,
}
