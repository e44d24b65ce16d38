use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ApibenchError;
use crate::plan::model::BenchPlan;
use crate::results::export::export_json;
use crate::results::TargetResult;

/// Read a benchmark plan (JSON with a `urls` array) from disk.
pub async fn read_plan(path: impl AsRef<Path>) -> Result<BenchPlan, ApibenchError> {
    read_json(path).await
}

/// Read any JSON document from disk.
pub async fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ApibenchError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Write sweep results to disk as a pretty-printed JSON array, preserving
/// their order.
pub async fn write_results(results: &[TargetResult], path: impl AsRef<Path>) -> Result<(), ApibenchError> {
    let content = export_json(results)?;
    tokio::fs::write(path.as_ref(), content).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
