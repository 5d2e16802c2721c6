//! # Host Scanner
//!
//! Walks the port set of a single host, one probe at a time, and streams
//! every open port to the sink the moment it is found.

use std::net::Ipv4Addr;
use std::time::Duration;

use sweepr_common::network::ports::PortSet;
use tokio::io::AsyncWrite;
use tracing::{error, trace};

use crate::probe::{self, Prober};
use crate::signal::StopSignal;
use crate::sink::ResultSink;

/// Per-host tally returned to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOutcome {
    pub host: Ipv4Addr,
    pub probed: usize,
    pub open: usize,
    pub write_errors: usize,
    /// The stop signal interrupted this host before its last port.
    pub cancelled: bool,
}

impl HostOutcome {
    fn new(host: Ipv4Addr) -> Self {
        Self {
            host,
            probed: 0,
            open: 0,
            write_errors: 0,
            cancelled: false,
        }
    }
}

/// Probes `ports` on `host` in set order. A raised `stop` signal drops the
/// in-flight connection attempt and ends the host early.
pub async fn scan_host<P, W>(
    host: Ipv4Addr,
    ports: &PortSet,
    timeout: Duration,
    prober: &P,
    sink: &ResultSink<W>,
    stop: &StopSignal,
) -> HostOutcome
where
    P: Prober + ?Sized,
    W: AsyncWrite + Unpin + Send,
{
    let mut outcome = HostOutcome::new(host);

    for port in ports.iter() {
        let result = tokio::select! {
            biased;
            _ = stop.stopped() => {
                outcome.cancelled = true;
                break;
            }
            result = probe::probe_port(prober, host, port, timeout) => result,
        };
        outcome.probed += 1;

        let Some(finding) = result.into_finding() else {
            continue;
        };
        outcome.open += 1;

        if let Err(e) = sink.record(finding).await {
            error!("{e}: {}", e.source);
            outcome.write_errors += 1;
        }
    }

    trace!("{host} done: {} probed, {} open", outcome.probed, outcome.open);
    outcome
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
