//! Live benchmarking: timed repetitions of single requests and sweeps over
//! all configured targets.

pub mod runner;
pub mod sweep;

pub use runner::{run, Repetition, RunOutcome};
pub use sweep::{run_sweep, SweepOptions, DEFAULT_REPETITIONS};
