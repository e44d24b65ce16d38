use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApibenchError {
    #[error("Resource unavailable: {}: {source}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Empty series: no samples to summarize")]
    EmptySeries,

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Division by zero: winning {metric} value is 0")]
    DivisionByZero { metric: String },

    #[error("Target '{tag}' failed: {source}")]
    Target {
        tag: String,
        #[source]
        source: Box<ApibenchError>,
    },

    #[error("Result file {} failed: {source}", path.display())]
    ResultFile {
        path: PathBuf,
        #[source]
        source: Box<ApibenchError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Handshake timeout: '{marker}' not seen within {timeout_ms}ms")]
    HandshakeTimeout { marker: String, timeout_ms: u64 },
}

impl ApibenchError {
    /// Attach the failing target's tag to an error.
    pub fn for_target(tag: impl Into<String>, source: ApibenchError) -> Self {
        ApibenchError::Target {
            tag: tag.into(),
            source: Box::new(source),
        }
    }

    /// Attach the failing result file's path to an error.
    pub fn for_result_file(path: impl Into<PathBuf>, source: ApibenchError) -> Self {
        ApibenchError::ResultFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

impl Serialize for ApibenchError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
