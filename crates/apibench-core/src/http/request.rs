use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ApibenchError;

// ---------------------------------------------------------------------------
// HttpMethod
// ---------------------------------------------------------------------------

/// Methods the timed runner knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    /// Whether the configured body is sent with this method.
    pub fn carries_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
        };
        write!(f, "{s}")
    }
}

impl FromStr for HttpMethod {
    type Err = ApibenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(ApibenchError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

// ---------------------------------------------------------------------------
// TargetConfig
// ---------------------------------------------------------------------------

/// One endpoint under benchmark, as listed in the plan file's `urls` array.
///
/// `method` keeps the raw text from the plan so an unknown verb only
/// surfaces when the runner tries to issue it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TargetConfig {
    pub url: String,

    /// Human-readable label shown in reports.
    pub tag: String,

    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl TargetConfig {
    /// Build a GET target with no headers or body.
    pub fn get(tag: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tag: tag.into(),
            method: default_method(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Parse the configured method.
    pub fn http_method(&self) -> Result<HttpMethod, ApibenchError> {
        self.method.parse()
    }

    /// Resolve this target into a concrete request, or fail with
    /// [`ApibenchError::UnsupportedMethod`].
    pub fn prepare(&self) -> Result<PreparedRequest<'_>, ApibenchError> {
        let method = self.http_method()?;
        Ok(PreparedRequest {
            method,
            url: &self.url,
            headers: &self.headers,
            body: if method.carries_body() {
                self.body.as_deref()
            } else {
                None
            },
        })
    }
}

/// A request ready to be handed to a [`crate::http::RequestSender`].
#[derive(Debug, Clone, Copy)]
pub struct PreparedRequest<'a> {
    pub method: HttpMethod,
    pub url: &'a str,
    pub headers: &'a HashMap<String, String>,
    pub body: Option<&'a str>,
}
