//! # Scan Coordinator
//!
//! Fans the host scanner out across every host of the target range and
//! waits for all of them.
//!
//! Hosts are dispatched in ascending order, each as its own tokio task. A
//! semaphore caps how many of them run at once, so a large range cannot
//! exhaust sockets or file descriptors. Findings from all tasks flow into one
//! [`ResultSink`]; the coordinator itself only counts completions.

use std::sync::Arc;
use std::time::Instant;

use sweepr_common::config::ScanConfig;
use sweepr_common::error::{ConfigError, SetupError};
use sweepr_common::finding::Finding;
use sweepr_common::network::ports::PortSet;
use tokio::io::AsyncWrite;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, warn};

use crate::probe::{Prober, TcpProber};
use crate::session::{ScanReport, SessionState};
use crate::signal::StopSignal;
use crate::sink::{Echo, ResultSink};

pub mod host;
#[cfg(test)]
pub(crate) mod testing;

pub use host::HostOutcome;

/// Snapshot handed to the progress callback after every finished host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub hosts_completed: usize,
    pub hosts_total: usize,
    pub open_ports: usize,
}

type ProgressCallback = Box<dyn Fn(Progress) + Send + Sync>;

#[derive(Default)]
struct Tally {
    dispatched: usize,
    completed: usize,
    open: usize,
    interrupted: usize,
}

pub struct ScanCoordinator<P> {
    config: ScanConfig,
    prober: Arc<P>,
    stop: StopSignal,
    echo: Option<Echo>,
    on_progress: Option<ProgressCallback>,
}

impl ScanCoordinator<TcpProber> {
    /// Coordinator using plain TCP connect probes.
    pub fn tcp(config: ScanConfig) -> Result<Self, ConfigError> {
        Self::new(config, TcpProber)
    }
}

impl<P> ScanCoordinator<P>
where
    P: Prober + 'static,
{
    pub fn new(config: ScanConfig, prober: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            prober: Arc::new(prober),
            stop: StopSignal::new(),
            echo: None,
            on_progress: None,
        })
    }

    /// Shares an externally owned stop signal, e.g. one wired to Ctrl-C.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Replaces the default stdout echo of the sink created by [`Self::run`].
    pub fn with_echo<F>(mut self, echo: F) -> Self
    where
        F: Fn(&Finding) + Send + Sync + 'static,
    {
        self.echo = Some(Box::new(echo));
        self
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Runs a full session against the log file named in the config.
    ///
    /// Fails only when the log cannot be prepared, in which case no probe
    /// has been sent.
    pub async fn run(mut self) -> Result<ScanReport, SetupError> {
        let mut state = SessionState::Initializing;

        let sink = match ResultSink::create(&self.config.log_path).await {
            Ok(sink) => sink,
            Err(e) => {
                state.advance(SessionState::Failed);
                return Err(e);
            }
        };

        let sink = match self.echo.take() {
            Some(echo) => sink.with_echo(echo),
            None => sink,
        };

        Ok(self.drive(sink, state).await)
    }

    /// Runs a session over a sink the caller already prepared.
    pub async fn run_with_sink<W>(self, sink: ResultSink<W>) -> ScanReport
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        self.drive(sink, SessionState::Initializing).await
    }

    async fn drive<W>(self, sink: ResultSink<W>, mut state: SessionState) -> ScanReport
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let log_path = sink.path().map(|path| path.to_path_buf());
        let sink: Arc<ResultSink<W>> = Arc::new(sink);
        let ports: Arc<PortSet> = Arc::new(self.config.ports.clone());
        let hosts_total: usize = self.config.targets.len();

        state.advance(SessionState::Running);
        let start_time: Instant = Instant::now();

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_hosts));
        let mut tasks: JoinSet<HostOutcome> = JoinSet::new();
        let mut tally = Tally::default();

        for host in self.config.targets.hosts() {
            let permit = loop {
                tokio::select! {
                    biased;
                    _ = self.stop.stopped() => break None,
                    Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                        self.reap(joined, &mut tally, hosts_total);
                    }
                    permit = semaphore.clone().acquire_owned() => break permit.ok(),
                }
            };

            let Some(permit) = permit else {
                warn!("Stop requested, {} hosts left undispatched", hosts_total - tally.dispatched);
                break;
            };

            let prober = self.prober.clone();
            let sink = sink.clone();
            let ports = ports.clone();
            let stop = self.stop.clone();
            let timeout = self.config.timeout;

            tasks.spawn(async move {
                let _permit = permit;
                host::scan_host(host, &ports, timeout, prober.as_ref(), sink.as_ref(), &stop).await
            });
            tally.dispatched += 1;
        }

        debug!("{} host tasks dispatched, waiting for completion", tally.dispatched);

        while let Some(joined) = tasks.join_next().await {
            self.reap(joined, &mut tally, hosts_total);
        }

        let recorded = sink.close().await;
        drop(sink);
        state.advance(SessionState::Completed);

        ScanReport {
            state,
            hosts_total,
            hosts_dispatched: tally.dispatched,
            hosts_completed: tally.completed,
            ports_per_host: self.config.ports.len(),
            findings: recorded.findings,
            write_errors: recorded.write_errors,
            elapsed: start_time.elapsed(),
            cancelled: tally.interrupted > 0 || tally.dispatched < hosts_total,
            log_path,
        }
    }

    fn reap(&self, joined: Result<HostOutcome, JoinError>, tally: &mut Tally, hosts_total: usize) {
        tally.completed += 1;

        match joined {
            Ok(outcome) => {
                tally.open += outcome.open;
                if outcome.cancelled {
                    tally.interrupted += 1;
                }
            }
            Err(e) => error!("Host task ended abnormally: {e}"),
        }

        if let Some(callback) = &self.on_progress {
            callback(Progress {
                hosts_completed: tally.completed,
                hosts_total,
                open_ports: tally.open,
            });
        }
    }
}

/// Scans with TCP connect probes and the settings in `config`.
pub async fn run_scan(config: ScanConfig) -> anyhow::Result<ScanReport> {
    let coordinator = ScanCoordinator::tcp(config)?;
    Ok(coordinator.run().await?)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
