use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::network::ports::PortSet;
use crate::network::range::TargetRange;

pub const DEFAULT_BASE_ADDRESS: &str = "192.168.1.";
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 300;
pub const DEFAULT_LOG_PATH: &str = "outputs/logs/netscan.log";
pub const DEFAULT_MAX_CONCURRENT_HOSTS: usize = 254;
/// Upper bound on hosts in flight. Each host holds one socket at a time, so
/// this sits far above any realistic descriptor limit.
pub const MAX_CONCURRENT_HOSTS: usize = 65_536;

/// Display settings for the terminal front-end.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Hides the banner printed at startup.
    pub no_banner: bool,
    /// 0 prints everything, 1 drops decorations, 2 only prints findings
    /// and the final summary line.
    pub quiet: u8,
}

/// Everything a scan session needs to run.
///
/// Built once before the session starts and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub targets: TargetRange,
    pub ports: PortSet,
    /// Budget for a single connection attempt.
    pub timeout: Duration,
    pub log_path: PathBuf,
    /// Ceiling on hosts scanned at the same time.
    pub max_concurrent_hosts: usize,
}

impl ScanConfig {
    pub fn new(targets: TargetRange, ports: PortSet) -> Self {
        Self {
            targets,
            ports,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_log_path(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = log_path.into();
        self
    }

    pub fn with_max_concurrent_hosts(mut self, max: usize) -> Self {
        self.max_concurrent_hosts = max;
        self
    }

    /// Rejects settings the coordinator cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_concurrent_hosts == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.max_concurrent_hosts > MAX_CONCURRENT_HOSTS {
            return Err(ConfigError::ConcurrencyTooHigh {
                requested: self.max_concurrent_hosts,
                max: MAX_CONCURRENT_HOSTS,
            });
        }
        if self.ports.is_empty() {
            return Err(ConfigError::EmptyPortSet);
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            targets: TargetRange::default(),
            ports: PortSet::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MILLIS),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            max_concurrent_hosts: DEFAULT_MAX_CONCURRENT_HOSTS,
        }
    }
}
