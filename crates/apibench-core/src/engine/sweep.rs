use serde::{Deserialize, Serialize};

use crate::engine::runner;
use crate::error::ApibenchError;
use crate::fixture::{with_fixtures, FixtureRule};
use crate::http::{RequestSender, TargetConfig};
use crate::results::TargetResult;

pub const DEFAULT_REPETITIONS: u32 = 10;

/// Settings for one pass over all targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SweepOptions {
    pub repetitions: u32,
    /// Snapshot each target's backing files and restore them afterwards.
    pub backup_enabled: bool,
    pub fixture_rule: FixtureRule,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            backup_enabled: false,
            fixture_rule: FixtureRule::default(),
        }
    }
}

/// Benchmark every target in order and return one [`TargetResult`] each.
///
/// Targets run strictly one after another, so fixture windows never overlap.
/// The first failing target stops the sweep; its error is wrapped in
/// [`ApibenchError::Target`] and no partial results are returned.
pub async fn run_sweep<S: RequestSender>(
    sender: &S,
    targets: &[TargetConfig],
    options: &SweepOptions,
) -> Result<Vec<TargetResult>, ApibenchError> {
    let mut results = Vec::with_capacity(targets.len());

    for (index, target) in targets.iter().enumerate() {
        tracing::info!("({}/{}) {}", index + 1, targets.len(), target.tag);

        let measured = if options.backup_enabled {
            let paths = options.fixture_rule.paths_for(&target.url);
            with_fixtures(&paths, measure(sender, target, options.repetitions)).await
        } else {
            measure(sender, target, options.repetitions).await
        };

        let result = measured.map_err(|err| ApibenchError::for_target(&target.tag, err))?;
        tracing::info!(
            tag = %result.tag,
            avg_ms = result.average_response_time,
            samples = result.num_requests,
            "target complete"
        );
        results.push(result);
    }

    Ok(results)
}

async fn measure<S: RequestSender>(
    sender: &S,
    target: &TargetConfig,
    repetitions: u32,
) -> Result<TargetResult, ApibenchError> {
    let outcome = runner::run(sender, target, repetitions).await?;
    let skipped = outcome.skipped();
    if skipped > 0 {
        tracing::warn!(tag = %target.tag, skipped, "repetitions skipped");
    }
    TargetResult::from_series(target, &outcome.samples())
}
