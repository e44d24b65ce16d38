use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ApibenchError;

// ---------------------------------------------------------------------------
// FixtureRule: URL to on-disk resource mapping
// ---------------------------------------------------------------------------

/// Maps a target URL onto the files that back it on the server's disk.
///
/// The URL has `url_prefix` replaced by `resource_root`, then each suffix is
/// appended to produce one path per resource facet. Fields missing from a
/// plan file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct FixtureRule {
    pub url_prefix: String,
    pub resource_root: String,
    pub suffixes: Vec<String>,
}

impl Default for FixtureRule {
    fn default() -> Self {
        Self {
            url_prefix: "http://localhost:3000".to_string(),
            resource_root: "../.data".to_string(),
            suffixes: vec![
                "$.ttl".to_string(),
                ".vSolid".to_string(),
                ".meta".to_string(),
            ],
        }
    }
}

impl FixtureRule {
    pub fn paths_for(&self, url: &str) -> Vec<PathBuf> {
        let resolved = url.replace(&self.url_prefix, &self.resource_root);
        self.suffixes
            .iter()
            .map(|suffix| PathBuf::from(format!("{resolved}{suffix}")))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// FixtureSet
// ---------------------------------------------------------------------------

/// Byte-exact contents of a set of files, captured before a benchmark round.
///
/// Restoring consumes the set, so a snapshot is applied at most once.
#[derive(Debug)]
#[must_use = "a captured fixture set should be restored"]
pub struct FixtureSet {
    contents: HashMap<PathBuf, Vec<u8>>,
}

impl FixtureSet {
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.contents.contains_key(path.as_ref())
    }

    /// Write every captured file back, replacing whatever is there now.
    ///
    /// Every path is attempted; the first failure is returned afterwards.
    pub async fn restore(self) -> Result<(), ApibenchError> {
        let mut first_error = None;
        for (path, content) in self.contents {
            if let Err(source) = tokio::fs::write(&path, &content).await {
                tracing::error!(path = %path.display(), "failed to restore fixture: {source}");
                if first_error.is_none() {
                    first_error = Some(ApibenchError::ResourceUnavailable { path, source });
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Read the full content of every path. No partial snapshot is returned.
pub async fn capture<P: AsRef<Path>>(paths: &[P]) -> Result<FixtureSet, ApibenchError> {
    let mut contents = HashMap::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| ApibenchError::ResourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        contents.insert(path.to_path_buf(), content);
    }
    tracing::debug!(files = contents.len(), "captured fixtures");
    Ok(FixtureSet { contents })
}

/// Run `operation` between a capture and a restore of `paths`.
///
/// The restore happens whether or not the operation succeeded. An operation
/// error wins over a restore error (the latter is logged); otherwise a
/// restore error is returned.
pub async fn with_fixtures<P, F, T>(paths: &[P], operation: F) -> Result<T, ApibenchError>
where
    P: AsRef<Path>,
    F: Future<Output = Result<T, ApibenchError>>,
{
    let snapshot = capture(paths).await?;
    let outcome = operation.await;
    let restored = snapshot.restore().await;

    match (outcome, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(restore_err)) => Err(restore_err),
        (Err(op_err), Ok(())) => Err(op_err),
        (Err(op_err), Err(restore_err)) => {
            tracing::error!("fixture restore failed after operation error: {restore_err}");
            Err(op_err)
        }
    }
}
