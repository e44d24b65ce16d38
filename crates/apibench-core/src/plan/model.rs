use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::SweepOptions;
use crate::error::ApibenchError;
use crate::fixture::FixtureRule;
use crate::http::{HttpClient, TargetConfig};

/// The benchmark input file.
///
/// Only `urls` is required; the fixture rule and client timeout fall back to
/// their defaults when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BenchPlan {
    pub urls: Vec<TargetConfig>,

    #[serde(default)]
    pub fixtures: FixtureRule,

    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl BenchPlan {
    pub fn sweep_options(&self, repetitions: u32, backup_enabled: bool) -> SweepOptions {
        SweepOptions {
            repetitions,
            backup_enabled,
            fixture_rule: self.fixtures.clone(),
        }
    }

    /// Build the HTTP client this plan asks for.
    pub fn client(&self) -> Result<HttpClient, ApibenchError> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}
