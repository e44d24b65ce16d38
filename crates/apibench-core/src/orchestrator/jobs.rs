use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use super::ServiceProcess;
use crate::error::ApibenchError;

/// One load-tool run: an optional setup command, the load script, and where
/// the tool writes its result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoadJob {
    pub script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Vec<String>>,
    pub output: String,
}

/// The orchestration input file.
///
/// `load_command` is a template: every `{script}` and `{output}` in its
/// arguments is replaced with the job's values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobPlan {
    pub service_command: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    #[serde(default = "default_ready_marker")]
    pub ready_marker: String,
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
    #[serde(default = "default_load_command")]
    pub load_command: Vec<String>,
    /// Pause between jobs so the previous service has fully released its port.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    pub jobs: Vec<LoadJob>,
}

fn default_ready_marker() -> String {
    "Loaded configs".to_string()
}

fn default_ready_timeout_secs() -> u64 {
    120
}

fn default_load_command() -> Vec<String> {
    ["k6", "run", "{script}", "--out", "csv={output}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_pause_ms() -> u64 {
    1000
}

impl JobPlan {
    fn load_command_for(&self, job: &LoadJob) -> Vec<String> {
        self.load_command
            .iter()
            .map(|arg| {
                arg.replace("{script}", &job.script)
                    .replace("{output}", &job.output)
            })
            .collect()
    }
}

/// Run a command to completion, failing on a non-zero exit.
async fn run_step(command: &[String], working_dir: Option<&Path>) -> Result<(), ApibenchError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ApibenchError::Validation("command must not be empty".to_string()))?;

    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let status = cmd
        .status()
        .await
        .map_err(|e| ApibenchError::Process(format!("failed to start '{program}': {e}")))?;
    if !status.success() {
        return Err(ApibenchError::Process(format!(
            "'{}' exited with {status}",
            command.join(" ")
        )));
    }
    Ok(())
}

/// Run one job: setup, start the service, wait for it, drive the load tool,
/// and shut the service down whatever the load tool did.
async fn run_job(plan: &JobPlan, job: &LoadJob) -> Result<(), ApibenchError> {
    let working_dir = plan.working_dir.as_deref();

    if let Some(setup) = &job.setup {
        tracing::info!(script = %job.script, "running setup: {}", setup.join(" "));
        run_step(setup, working_dir).await?;
    }

    let mut service = ServiceProcess::spawn(&plan.service_command, working_dir)?;

    let loaded = async {
        service
            .wait_ready(&plan.ready_marker, Duration::from_secs(plan.ready_timeout_secs))
            .await?;
        service.begin_load()?;
        tracing::info!(script = %job.script, output = %job.output, "executing load tool");
        run_step(&plan.load_command_for(job), working_dir).await
    }
    .await;

    let terminated = service.terminate().await;

    match (loaded, terminated) {
        (Ok(()), Ok(_)) => Ok(()),
        (Ok(()), Err(err)) => Err(err),
        (Err(err), Ok(_)) => Err(err),
        (Err(err), Err(term_err)) => {
            tracing::error!("service shutdown failed after job error: {term_err}");
            Err(err)
        }
    }
}

/// Run every job in order, halting on the first failure.
///
/// Returns the output paths of the completed jobs.
pub async fn run_jobs(plan: &JobPlan) -> Result<Vec<String>, ApibenchError> {
    let pause = Duration::from_millis(plan.pause_ms);
    let mut completed = Vec::with_capacity(plan.jobs.len());

    for (index, job) in plan.jobs.iter().enumerate() {
        tracing::info!("({}/{}) {}", index + 1, plan.jobs.len(), job.script);
        run_job(plan, job).await?;
        tracing::info!(script = %job.script, "finished job");
        completed.push(job.output.clone());

        if index + 1 < plan.jobs.len() && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    tracing::info!(jobs = completed.len(), "all jobs completed");
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_plan_uses_defaults() {
        let json = r#"{
            "service_command": ["npm", "run", "start"],
            "jobs": [{"script": "k6/js/init.js", "output": "bencherResults/init.js.csv"}]
        }"#;
        let plan: JobPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.ready_marker, "Loaded configs");
        assert_eq!(plan.ready_timeout_secs, 120);
        assert_eq!(plan.pause_ms, 1000);
        assert!(plan.working_dir.is_none());
        assert!(plan.jobs[0].setup.is_none());
        assert_eq!(
            plan.load_command_for(&plan.jobs[0]),
            vec![
                "k6",
                "run",
                "k6/js/init.js",
                "--out",
                "csv=bencherResults/init.js.csv"
            ]
        );
    }

    #[test]
    fn plan_without_service_command_is_rejected() {
        let result = serde_json::from_str::<JobPlan>(r#"{"jobs": []}"#);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    mod process {
        use super::super::*;

        fn sh(script: &str) -> Vec<String> {
            vec!["sh".to_string(), "-c".to_string(), script.to_string()]
        }

        fn plan(dir: &Path, service: &str, load: &str, jobs: Vec<LoadJob>) -> JobPlan {
            JobPlan {
                service_command: sh(service),
                working_dir: Some(dir.to_path_buf()),
                ready_marker: "Loaded configs".to_string(),
                ready_timeout_secs: 5,
                load_command: sh(load),
                pause_ms: 0,
                jobs,
            }
        }

        fn job(script: &str, output: &str, setup: Option<&str>) -> LoadJob {
            LoadJob {
                script: script.to_string(),
                setup: setup.map(sh),
                output: output.to_string(),
            }
        }

        #[tokio::test]
        async fn jobs_run_in_order_with_setup() {
            let dir = tempfile::tempdir().expect("tempdir should be created");
            let plan = plan(
                dir.path(),
                "echo 'Loaded configs'; sleep 5",
                "echo {script} > {output}; echo {script} >> order.log",
                vec![
                    job("init.js", "init.csv", Some("echo setupA >> order.log")),
                    job("other.js", "other.csv", None),
                ],
            );

            let outputs = run_jobs(&plan).await.expect("jobs should succeed");
            assert_eq!(outputs, vec!["init.csv", "other.csv"]);

            let log = tokio::fs::read_to_string(dir.path().join("order.log")).await.unwrap();
            assert_eq!(log, "setupA\ninit.js\nother.js\n");
            let init = tokio::fs::read_to_string(dir.path().join("init.csv")).await.unwrap();
            assert_eq!(init.trim(), "init.js");
        }

        #[tokio::test]
        async fn failing_setup_skips_service_and_halts() {
            let dir = tempfile::tempdir().expect("tempdir should be created");
            let plan = plan(
                dir.path(),
                "echo started >> service.log; echo 'Loaded configs'; sleep 5",
                "echo {script} >> order.log",
                vec![
                    job("init.js", "init.csv", Some("exit 3")),
                    job("other.js", "other.csv", None),
                ],
            );

            let err = run_jobs(&plan).await.unwrap_err();
            assert!(matches!(err, ApibenchError::Process(_)));
            assert!(!dir.path().join("service.log").exists());
            assert!(!dir.path().join("order.log").exists());
        }

        #[tokio::test]
        async fn failing_load_tool_still_stops_service() {
            let dir = tempfile::tempdir().expect("tempdir should be created");
            let plan = plan(
                dir.path(),
                "echo 'Loaded configs'; sleep 5",
                "exit 1",
                vec![job("init.js", "init.csv", None)],
            );

            let started = std::time::Instant::now();
            let err = run_jobs(&plan).await.unwrap_err();
            assert!(matches!(err, ApibenchError::Process(_)));
            assert!(started.elapsed() < Duration::from_secs(5));
        }

        #[tokio::test]
        async fn unready_service_times_out() {
            let dir = tempfile::tempdir().expect("tempdir should be created");
            let mut plan = plan(
                dir.path(),
                "echo booting; sleep 5",
                "echo {script} >> order.log",
                vec![job("init.js", "init.csv", None)],
            );
            plan.ready_timeout_secs = 1;

            let err = run_jobs(&plan).await.unwrap_err();
            assert!(matches!(err, ApibenchError::HandshakeTimeout { .. }));
            assert!(!dir.path().join("order.log").exists());
        }
    }
}
