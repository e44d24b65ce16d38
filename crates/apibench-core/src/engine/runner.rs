use std::time::Instant;

use crate::error::ApibenchError;
use crate::http::{RequestSender, TargetConfig};
use crate::stats::SampleSeries;

// ---------------------------------------------------------------------------
// Repetition outcomes
// ---------------------------------------------------------------------------

/// What happened to one repetition of a target.
#[derive(Debug, Clone, PartialEq)]
pub enum Repetition {
    /// Elapsed wall time of the request, in milliseconds.
    Recorded(f64),
    /// The repetition issued no request.
    Skipped(String),
}

/// Ordered outcomes of every repetition for a single target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    pub repetitions: Vec<Repetition>,
}

impl RunOutcome {
    /// Recorded samples, in repetition order.
    pub fn samples(&self) -> SampleSeries {
        self.repetitions
            .iter()
            .filter_map(|r| match r {
                Repetition::Recorded(ms) => Some(*ms),
                Repetition::Skipped(_) => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.repetitions
            .iter()
            .filter(|r| matches!(r, Repetition::Skipped(_)))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Upper bound on the outcome buffer reserved up front; larger runs grow it.
const MAX_PREALLOCATED: u32 = 1024;

/// Issue `repetitions` sequential requests for `target`, timing each one.
///
/// A repetition whose method cannot be issued is logged and recorded as
/// [`Repetition::Skipped`]. HTTP status codes are ignored; only a transport
/// failure aborts the run.
pub async fn run<S: RequestSender>(
    sender: &S,
    target: &TargetConfig,
    repetitions: u32,
) -> Result<RunOutcome, ApibenchError> {
    if repetitions == 0 {
        return Err(ApibenchError::Validation(
            "repetitions must be at least 1".to_string(),
        ));
    }

    let mut outcome = RunOutcome {
        repetitions: Vec::with_capacity(repetitions.min(MAX_PREALLOCATED) as usize),
    };

    for i in 0..repetitions {
        tracing::debug!(tag = %target.tag, "request {}/{}", i + 1, repetitions);

        let request = match target.prepare() {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(tag = %target.tag, "skipping repetition {}: {err}", i + 1);
                outcome.repetitions.push(Repetition::Skipped(err.to_string()));
                continue;
            }
        };

        let start = Instant::now();
        let response = sender.send(request).await?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::trace!(tag = %target.tag, status = response.status, elapsed_ms, "recorded");
        outcome.repetitions.push(Repetition::Recorded(elapsed_ms));
    }

    Ok(outcome)
}
