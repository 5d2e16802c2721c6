use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::SystemTime;

/// Outcome of one probe against a single (host, port) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub host: Ipv4Addr,
    pub port: u16,
    pub reachable: bool,
    pub observed_at: SystemTime,
}

impl ProbeResult {
    /// Converts a positive result into a finding. Negative results are
    /// discarded by the caller.
    pub fn into_finding(self) -> Option<Finding> {
        self.reachable.then(|| Finding {
            host: self.host,
            port: self.port,
            observed_at: self.observed_at,
        })
    }
}

/// A (host, port) pair that accepted a connection.
///
/// `Display` renders the exact line written to the result log and echoed to
/// the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Finding {
    pub host: Ipv4Addr,
    pub port: u16,
    pub observed_at: SystemTime,
}

impl Finding {
    pub fn new(host: Ipv4Addr, port: u16) -> Self {
        Self {
            host,
            port,
            observed_at: SystemTime::now(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.host, self.port)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[!] Open Port Detected: {}", self.socket_addr())
    }
}
