use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected scan configuration. Raised while building the session inputs,
/// never while iterating them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base address '{0}': expected three octets such as 192.168.1")]
    BaseAddress(String),

    #[error("invalid host range {min}-{max}: lower bound is above upper bound")]
    InvertedRange { min: u8, max: u8 },

    #[error("invalid host range '{0}': expected MIN-MAX with values in 0-255")]
    HostRange(String),

    #[error("invalid target: {0}")]
    Target(String),

    #[error("invalid port '{0}': expected a number in 1-65535")]
    Port(String),

    #[error("port set must contain at least one port")]
    EmptyPortSet,

    #[error("probe timeout must be greater than zero")]
    ZeroTimeout,

    #[error("concurrency ceiling must be at least 1")]
    ZeroConcurrency,

    #[error("concurrency ceiling {requested} is above the supported maximum of {max}")]
    ConcurrencyTooHigh { requested: usize, max: usize },
}

/// The log resource could not be prepared. Aborts the session before the
/// first probe.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("unable to create log directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to create log file {}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single finding could not be appended to the log.
#[derive(Error, Debug)]
#[error("failed to append '{line}' to the result log")]
pub struct WriteError {
    pub line: String,
    #[source]
    pub source: io::Error,
}
