//! # Target Range
//!
//! A closed, ascending interval of IPv4 hosts. This is the only source of
//! host identifiers for a scan session; it is built once from configuration
//! and never changes afterwards.

use std::net::Ipv4Addr;

use crate::error::ConfigError;

/// Default suffix interval used with a base prefix (`x.y.z.1` to `x.y.z.254`).
pub const DEFAULT_HOST_RANGE: (u8, u8) = (1, 254);

/// Represents a continuous range of IPv4 hosts, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetRange {
    start: Ipv4Addr,
    end: Ipv4Addr,
}

impl TargetRange {
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Result<Self, ConfigError> {
        if u32::from(start) > u32::from(end) {
            return Err(ConfigError::Target(format!(
                "range start {start} is above range end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds the range `<base>.<min>` to `<base>.<max>`.
    ///
    /// The base accepts `192.168.1` as well as the trailing-dot form
    /// `192.168.1.`.
    pub fn from_prefix(base: &str, min: u8, max: u8) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedRange { min, max });
        }
        let [a, b, c] = parse_base_address(base)?;
        Ok(Self {
            start: Ipv4Addr::new(a, b, c, min),
            end: Ipv4Addr::new(a, b, c, max),
        })
    }

    /// Creates a range from an IP and a CIDR prefix (e.g., 192.168.1.0/24).
    ///
    /// Network and broadcast addresses are stripped when the block is large
    /// enough to have usable hosts in between.
    pub fn from_cidr(ip: Ipv4Addr, prefix: u8) -> Result<Self, ConfigError> {
        let network = pnet::ipnetwork::Ipv4Network::new(ip, prefix)
            .map_err(|e| ConfigError::Target(format!("{ip}/{prefix}: {e}")))?;

        let net_u32: u32 = u32::from(network.network());
        let broadcast_u32: u32 = u32::from(network.broadcast());

        if prefix >= 31 {
            return Ok(Self {
                start: Ipv4Addr::from(net_u32),
                end: Ipv4Addr::from(broadcast_u32),
            });
        }

        Ok(Self {
            start: Ipv4Addr::from(net_u32 + 1),
            end: Ipv4Addr::from(broadcast_u32 - 1),
        })
    }

    pub fn start(&self) -> Ipv4Addr {
        self.start
    }

    pub fn end(&self) -> Ipv4Addr {
        self.end
    }

    /// Yields every host exactly once, in ascending order. The iterator is
    /// cheap to clone, so the sequence can be restarted at will.
    pub fn hosts(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone + Send + use<> {
        let start: u32 = u32::from(self.start);
        let end: u32 = u32::from(self.end);
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn len(&self) -> usize {
        (u32::from(self.end) - u32::from(self.start)) as usize + 1
    }

    /// A constructed range always holds at least one host.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// `192.168.1.1` to `192.168.1.254`.
impl Default for TargetRange {
    fn default() -> Self {
        let (min, max) = DEFAULT_HOST_RANGE;
        Self {
            start: Ipv4Addr::new(192, 168, 1, min),
            end: Ipv4Addr::new(192, 168, 1, max),
        }
    }
}

impl std::fmt::Display for TargetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses a `MIN-MAX` suffix interval such as `1-254`. A single number is
/// accepted as a one-host interval.
pub fn parse_host_range(s: &str) -> Result<(u8, u8), ConfigError> {
    let invalid = || ConfigError::HostRange(s.to_string());

    let (min, max) = match s.split_once('-') {
        Some((min, max)) => (min.trim(), max.trim()),
        None => (s.trim(), s.trim()),
    };

    let min: u8 = min.parse().map_err(|_| invalid())?;
    let max: u8 = max.parse().map_err(|_| invalid())?;

    if min > max {
        return Err(ConfigError::InvertedRange { min, max });
    }
    Ok((min, max))
}

fn parse_base_address(base: &str) -> Result<[u8; 3], ConfigError> {
    let invalid = || ConfigError::BaseAddress(base.to_string());

    let trimmed: &str = base.trim().strip_suffix('.').unwrap_or(base.trim());
    let octets: Vec<u8> = trimmed
        .split('.')
        .map(|octet| octet.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| invalid())?;

    <[u8; 3]>::try_from(octets).map_err(|_| invalid())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
