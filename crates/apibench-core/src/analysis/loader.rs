use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ApibenchError;
use crate::results::RunSummary;
use crate::stats::{bytes_to_kilobytes, bytes_to_megabytes, summarize, MetricKind, SampleSeries};

pub const HTTP_REQ_DURATION: &str = "http_req_duration";
pub const HTTP_REQS: &str = "http_reqs";
pub const DATA_SENT: &str = "data_sent";
pub const DATA_RECEIVED: &str = "data_received";

/// The columns we need from a k6 CSV row; other columns are ignored.
#[derive(Debug, Deserialize)]
struct MetricRow {
    metric_name: String,
    timestamp: f64,
    metric_value: f64,
}

/// Reduce one CSV metric stream into a [`RunSummary`] labelled `key`.
///
/// Durations are averaged, request timestamps become a rate, and byte
/// counters are summed then converted once.
pub fn summarize_csv<R: std::io::Read>(key: &str, reader: R) -> Result<RunSummary, ApibenchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut durations = SampleSeries::new();
    let mut request_times = SampleSeries::new();
    let mut bytes_sent = 0.0;
    let mut bytes_received = 0.0;

    for row in csv_reader.deserialize::<MetricRow>() {
        let row = row?;
        match row.metric_name.as_str() {
            HTTP_REQ_DURATION => durations.push(row.metric_value),
            HTTP_REQS => request_times.push(row.timestamp),
            DATA_SENT => bytes_sent += row.metric_value,
            DATA_RECEIVED => bytes_received += row.metric_value,
            _ => {}
        }
    }

    Ok(RunSummary {
        key: key.to_string(),
        data_received: bytes_to_megabytes(bytes_received),
        data_sent: bytes_to_kilobytes(bytes_sent),
        http_req_duration: summarize(&durations, MetricKind::CentralTendency)?,
        rps: summarize(&request_times, MetricKind::Rate)?,
    })
}

/// Load and summarize a single result file, keyed by its file name.
pub async fn load_result_file(path: impl AsRef<Path>) -> Result<RunSummary, ApibenchError> {
    let path = path.as_ref();
    let key = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::info!("Processing file: {key}");

    let content = tokio::fs::read(path)
        .await
        .map_err(|err| ApibenchError::for_result_file(path, err.into()))?;
    summarize_csv(&key, content.as_slice())
        .map_err(|err| ApibenchError::for_result_file(path, err))
}

/// List the `.csv` files directly inside `dir`, sorted by file name.
pub async fn result_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ApibenchError> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir.as_ref()).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Summarize every result file in `dir`. The first bad file aborts the load.
pub async fn load_result_dir(dir: impl AsRef<Path>) -> Result<Vec<RunSummary>, ApibenchError> {
    let mut summaries = Vec::new();
    for path in result_files(dir).await? {
        summaries.push(load_result_file(&path).await?);
    }
    Ok(summaries)
}
