//! # Scan Session
//!
//! Lifecycle and outcome of one run of the coordinator.
//!
//! ```text
//! Initializing ──► Running ──► Completed
//!      │
//!      └────────► Failed
//! ```

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use sweepr_common::finding::Finding;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Preparing the log resource. No probe has been sent.
    Initializing,
    /// The log is open and host tasks are being dispatched.
    Running,
    /// Every dispatched host task finished and the log was released.
    Completed,
    /// The log resource could not be prepared.
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Moves to `next`, logging the transition. Terminal states never move.
    pub(crate) fn advance(&mut self, next: SessionState) {
        if self.is_terminal() {
            return;
        }
        debug!("session {self} -> {next}");
        *self = next;
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What a completed session hands back to its caller.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub state: SessionState,
    pub hosts_total: usize,
    pub hosts_dispatched: usize,
    pub hosts_completed: usize,
    pub ports_per_host: usize,
    /// Findings that reached the log, in write order.
    pub findings: Vec<Finding>,
    /// Findings that were discovered but could not be appended.
    pub write_errors: usize,
    pub elapsed: Duration,
    /// The stop signal was raised before every host was scanned.
    pub cancelled: bool,
    pub log_path: Option<PathBuf>,
}

impl ScanReport {
    pub fn open_ports(&self) -> usize {
        self.findings.len()
    }

    /// Findings ordered by host, then port.
    pub fn sorted_findings(&self) -> Vec<Finding> {
        let mut findings: Vec<Finding> = self.findings.clone();
        findings.sort_by_key(|f| (f.host, f.port));
        findings
    }
}
