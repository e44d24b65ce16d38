mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use apibench_core::analysis::{load_result_dir, rank, rank_by, Direction, Metric};
use apibench_core::engine::run_sweep;
use apibench_core::orchestrator::{run_jobs, JobPlan};
use apibench_core::plan::io::{read_json, read_plan, write_results};
use apibench_core::plan::validate_plan;
use apibench_core::results::export::{render_ranking, render_results_table, render_target_ranking};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apibench=info,apibench_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::Args::parse();

    match args.command {
        cli::Commands::Bench {
            input,
            output,
            requests,
            backup_files,
        } => bench(&input, &output, requests, backup_files).await,
        cli::Commands::Analyze { dir } => analyze(&dir).await,
        cli::Commands::Orchestrate { jobs } => orchestrate(&jobs).await,
    }
}

async fn bench(input: &Path, output: &Path, requests: u32, backup_files: bool) -> Result<()> {
    let plan = read_plan(input)
        .await
        .with_context(|| format!("Failed to read plan {}", input.display()))?;

    let errors = validate_plan(&plan);
    if !errors.is_empty() {
        let listed = errors
            .iter()
            .map(|e| format!("  - {e}"))
            .collect::<Vec<_>>()
            .join("\n");
        anyhow::bail!("Invalid plan {}:\n{listed}", input.display());
    }

    let client = plan.client()?;
    let options = plan.sweep_options(requests, backup_files);
    tracing::info!(
        targets = plan.urls.len(),
        requests,
        backup_files,
        "starting benchmark"
    );

    let results = run_sweep(&client, &plan.urls, &options).await?;

    println!("{}", render_results_table(&results));
    match rank_by(&results, "average_response_time", Direction::Min, |r| {
        r.average_response_time
    }) {
        Ok(ranking) => println!("{}", render_target_ranking(&ranking)),
        Err(err) => tracing::warn!("could not rank targets: {err}"),
    }

    write_results(&results, output)
        .await
        .with_context(|| format!("Failed to write results to {}", output.display()))?;
    tracing::info!(path = %output.display(), "results written");
    Ok(())
}

async fn analyze(dir: &Path) -> Result<()> {
    let summaries = load_result_dir(dir).await?;
    println!("processed {} files", summaries.len());

    if summaries.is_empty() {
        tracing::warn!(dir = %dir.display(), "no result files to rank");
        return Ok(());
    }

    let by_rps = rank(&summaries, Metric::Rps, Direction::Max)?;
    println!("{}", render_ranking(&by_rps, true));

    let by_duration = rank(&summaries, Metric::HttpReqDuration, Direction::Min)?;
    println!("{}", render_ranking(&by_duration, false));
    Ok(())
}

async fn orchestrate(jobs: &Path) -> Result<()> {
    let plan: JobPlan = read_json(jobs)
        .await
        .with_context(|| format!("Failed to read job plan {}", jobs.display()))?;

    let outputs = run_jobs(&plan).await?;
    for output in &outputs {
        println!("{output}");
    }
    Ok(())
}
