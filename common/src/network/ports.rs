//! # Port Set
//!
//! The ordered list of TCP ports probed on every host of a session.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Ports probed when nothing else is configured.
pub const DEFAULT_PORTS: [u16; 7] = [21, 22, 23, 80, 443, 3306, 8080];

/// An ordered, non-empty set of ports.
///
/// Iteration follows insertion order. Repeated ports are dropped when the set
/// is built, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSet(Vec<u16>);

impl PortSet {
    pub fn new<I>(ports: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut ordered: Vec<u16> = Vec::new();
        let mut seen: HashSet<u16> = HashSet::new();
        for port in ports {
            if port == 0 {
                return Err(ConfigError::Port(port.to_string()));
            }
            if seen.insert(port) {
                ordered.push(port);
            }
        }

        if ordered.is_empty() {
            return Err(ConfigError::EmptyPortSet);
        }
        Ok(Self(ordered))
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }
}

impl Default for PortSet {
    fn default() -> Self {
        Self(DEFAULT_PORTS.to_vec())
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(u16::to_string).collect();
        write!(f, "{}", joined.join(","))
    }
}

/// Parses lists such as `22,80,443` and ranges such as `8000-8010`, freely
/// mixed (`21-23,80,8080`).
impl FromStr for PortSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ports: Vec<u16> = Vec::new();

        for part in s.split(',') {
            let part: &str = part.trim();
            if part.is_empty() {
                continue;
            }

            match part.split_once('-') {
                Some((low, high)) => {
                    let low: u16 = parse_port(low.trim())?;
                    let high: u16 = parse_port(high.trim())?;
                    if low > high {
                        return Err(ConfigError::Port(part.to_string()));
                    }
                    ports.extend(low..=high);
                }
                None => ports.push(parse_port(part)?),
            }
        }

        Self::new(ports)
    }
}

fn parse_port(s: &str) -> Result<u16, ConfigError> {
    match s.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::Port(s.to_string())),
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
