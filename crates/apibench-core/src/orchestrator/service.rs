use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

use super::ServiceState;
use crate::error::ApibenchError;

/// A running service under test.
///
/// The child is killed if the handle is dropped, so a failed job never
/// leaves the service behind.
pub struct ServiceProcess {
    child: Child,
    program: String,
    stdout: Option<Lines<BufReader<ChildStdout>>>,
    state: ServiceState,
}

impl ServiceProcess {
    /// Spawn `command` (program followed by its arguments) with stdout piped.
    pub fn spawn(command: &[String], working_dir: Option<&Path>) -> Result<Self, ApibenchError> {
        let (program, args) = command.split_first().ok_or_else(|| {
            ApibenchError::Validation("service command must not be empty".to_string())
        })?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| ApibenchError::Process(format!("failed to start '{program}': {e}")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ApibenchError::Process(format!("stdout of '{program}' not captured")))?;

        tracing::info!(program = %program, pid = ?child.id(), "service started");

        Ok(Self {
            child,
            program: program.clone(),
            stdout: Some(BufReader::new(stdout).lines()),
            state: ServiceState::Starting,
        })
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    fn transition(&mut self, next: ServiceState) -> Result<(), ApibenchError> {
        if !self.state.can_transition_to(next) {
            return Err(ApibenchError::Process(format!(
                "service '{}' cannot go from {} to {}",
                self.program, self.state, next
            )));
        }
        tracing::debug!(program = %self.program, from = %self.state, to = %next, "service state");
        self.state = next;
        Ok(())
    }

    /// Read stdout line by line until one contains `marker`.
    ///
    /// Fails with `HandshakeTimeout` when `timeout` expires first and with
    /// `Process` when the output ends without the marker. Once ready, the
    /// rest of the output is drained in the background at debug level.
    pub async fn wait_ready(&mut self, marker: &str, timeout: Duration) -> Result<(), ApibenchError> {
        self.transition(ServiceState::WaitingForReady)?;

        let Some(lines) = self.stdout.as_mut() else {
            return Err(ApibenchError::Process(format!(
                "stdout of '{}' already consumed",
                self.program
            )));
        };

        let scan = async {
            while let Some(line) = lines.next_line().await? {
                tracing::debug!(target: "apibench_core::service", "{line}");
                if line.contains(marker) {
                    return Ok(true);
                }
            }
            Ok::<_, std::io::Error>(false)
        };

        let outcome = match tokio::time::timeout(timeout, scan).await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(ApibenchError::Process(format!(
                "service '{}' closed its output before printing '{marker}'",
                self.program
            ))),
            Ok(Err(e)) => Err(ApibenchError::Io(e)),
            Err(_) => Err(ApibenchError::HandshakeTimeout {
                marker: marker.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match outcome {
            Ok(()) => {
                self.transition(ServiceState::Ready)?;
                tracing::info!(program = %self.program, "service is ready");
                if let Some(mut rest) = self.stdout.take() {
                    tokio::spawn(async move {
                        while let Ok(Some(line)) = rest.next_line().await {
                            tracing::debug!(target: "apibench_core::service", "{line}");
                        }
                    });
                }
                Ok(())
            }
            Err(err) => {
                self.transition(ServiceState::Failed)?;
                Err(err)
            }
        }
    }

    /// Mark the service as under load. Only legal once it is ready.
    pub fn begin_load(&mut self) -> Result<(), ApibenchError> {
        self.transition(ServiceState::Running)
    }

    /// Kill the service and wait for it to exit.
    pub async fn terminate(&mut self) -> Result<ExitStatus, ApibenchError> {
        self.transition(ServiceState::Terminating)?;
        tracing::info!(program = %self.program, "shutting down service");

        let status = match self.child.try_wait()? {
            Some(status) => status,
            None => {
                self.child.start_kill()?;
                self.child.wait().await?
            }
        };

        self.transition(ServiceState::Terminated)?;
        Ok(status)
    }
}
