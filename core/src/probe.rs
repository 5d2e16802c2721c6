//! # Port Probe
//!
//! A probe is one bounded connection attempt to a single (host, port) pair.
//! It answers a yes/no question: did the TCP handshake complete before the
//! timeout? Refused, timed out and unreachable all collapse into `false`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use sweepr_common::finding::ProbeResult;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Strategy for checking whether a port accepts connections.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns `true` iff a connection was established within `timeout`.
    ///
    /// Implementations must not block past the timeout and must release any
    /// connection they opened before returning.
    async fn probe(&self, host: Ipv4Addr, port: u16, timeout: Duration) -> bool;
}

/// Plain TCP connect probe. Performs the handshake and closes the socket
/// without exchanging any data.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, host: Ipv4Addr, port: u16, probe_timeout: Duration) -> bool {
        let socket_addr: SocketAddr = SocketAddr::new(IpAddr::V4(host), port);

        match timeout(probe_timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                true
            }
            Ok(Err(e)) => {
                trace!("{socket_addr} closed: {e}");
                false
            }
            Err(_elapsed) => {
                trace!("{socket_addr} timed out after {probe_timeout:?}");
                false
            }
        }
    }
}

/// Runs a single probe and stamps the outcome.
pub async fn probe_port<P>(prober: &P, host: Ipv4Addr, port: u16, timeout: Duration) -> ProbeResult
where
    P: Prober + ?Sized,
{
    let reachable: bool = prober.probe(host, port, timeout).await;
    ProbeResult {
        host,
        port,
        reachable,
        observed_at: SystemTime::now(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
