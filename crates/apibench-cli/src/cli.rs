use std::path::PathBuf;

use apibench_core::engine::DEFAULT_REPETITIONS;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Time every target in a plan file and write the results as JSON
    Bench {
        /// Plan file listing the targets under `urls`
        input: PathBuf,

        /// Where to write the results
        output: PathBuf,

        /// Repetitions per target
        #[arg(short = 'n', long, default_value_t = DEFAULT_REPETITIONS, value_parser = clap::value_parser!(u32).range(1..))]
        requests: u32,

        /// Snapshot each target's backing files and restore them after its run
        #[arg(long, default_value_t = false)]
        backup_files: bool,
    },
    /// Summarize and rank a directory of k6 CSV result files
    Analyze {
        /// Directory holding the result files
        #[arg(default_value = "./benchmarkResults")]
        dir: PathBuf,
    },
    /// Run load jobs against a locally started service
    Orchestrate {
        /// Job plan file
        jobs: PathBuf,
    },
}
