//! Scripted benchmark runs against a locally started service: run a setup
//! step, start the service, wait for its ready marker, drive an external
//! load tool, then shut the service down.

pub mod jobs;
pub mod service;

pub use jobs::{run_jobs, JobPlan, LoadJob};
pub use service::ServiceProcess;

/// Lifecycle of a service started for one load job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceState {
    /// Process spawned, output not yet inspected.
    #[default]
    Starting,
    /// Scanning output for the ready marker.
    WaitingForReady,
    /// Ready marker seen.
    Ready,
    /// Load tool is running against the service.
    Running,
    /// Kill requested, waiting for the process to exit.
    Terminating,
    Terminated,
    /// Handshake failed; the process is still owned and must be terminated.
    Failed,
}

impl ServiceState {
    /// Whether moving from `self` to `next` is a legal step.
    ///
    /// Termination is reachable from every live state so a service can
    /// always be shut down.
    pub fn can_transition_to(self, next: ServiceState) -> bool {
        use ServiceState::*;
        matches!(
            (self, next),
            (Starting, WaitingForReady)
                | (WaitingForReady, Ready)
                | (WaitingForReady, Failed)
                | (Ready, Running)
                | (Starting | WaitingForReady | Ready | Running | Failed, Terminating)
                | (Terminating, Terminated)
        )
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServiceState::Starting => "starting",
            ServiceState::WaitingForReady => "waiting_for_ready",
            ServiceState::Ready => "ready",
            ServiceState::Running => "running",
            ServiceState::Terminating => "terminating",
            ServiceState::Terminated => "terminated",
            ServiceState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
