use serde::{Deserialize, Serialize};

/// What the runner keeps from a completed HTTP exchange. The body is read
/// to completion so timing covers the full response, then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResponseInfo {
    /// HTTP response status code (e.g. 200, 404). Not used for timing.
    pub status: u16,

    /// Number of bytes in the raw response body.
    pub size_bytes: u64,
}

impl ResponseInfo {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
