//! Offline analysis of k6 result files: reduce each file to a
//! [`RunSummary`](crate::results::RunSummary) and rank the runs.

pub mod loader;
pub mod ranking;

pub use loader::{load_result_dir, load_result_file, result_files, summarize_csv};
pub use ranking::{percent_delta, rank, rank_by, Direction, Metric, RankedEntry, Ranking};
