//! # Scan Target Notation
//!
//! Parses the `--target` argument into a [`TargetRange`].
//!
//! Supported formats:
//! * A single IPv4 address (`192.168.1.5`).
//! * An IPv4 range (`192.168.1.1-100` or `192.168.1.1-192.168.1.100`).
//! * A CIDR block (`192.168.1.0/24`).

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::network::range::TargetRange;

impl FromStr for TargetRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s: &str = s.trim();

        if let Some(range) = parse_host(s) {
            return Ok(range);
        }

        if let Some(range) = parse_ip_range(s)? {
            return Ok(range);
        }

        if let Some(range) = parse_cidr_range(s)? {
            return Ok(range);
        }

        Err(ConfigError::Target(s.to_string()))
    }
}

/// Parses a single IP address into a one-host range.
fn parse_host(s: &str) -> Option<TargetRange> {
    let addr = s.parse::<Ipv4Addr>().ok()?;
    TargetRange::new(addr, addr).ok()
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
fn parse_ip_range(s: &str) -> Result<Option<TargetRange>, ConfigError> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let start_addr = start_str
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|e| ConfigError::Target(format!("invalid start IP in range '{start_str}': {e}")))?;

    let end_addr = parse_range_end_addr(end_str.trim(), &start_addr, s)?;

    TargetRange::new(start_addr, end_addr).map(Some)
}

/// Helper to parse the end address of a range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
    original_s: &str,
) -> Result<Ipv4Addr, ConfigError> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err(ConfigError::Target(format!(
            "end range cannot be empty: {original_s}"
        )));
    }

    let mut end_octets = start_addr.octets();
    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| ConfigError::Target(format!("invalid end range '{end_str}': {e}")))?;

    if partial_octets.len() > 4 {
        return Err(ConfigError::Target(format!(
            "end range has too many octets: {end_str}"
        )));
    }

    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr_range(s: &str) -> Result<Option<TargetRange>, ConfigError> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| ConfigError::Target(format!("invalid IP in CIDR '{ip_str}': {e}")))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| ConfigError::Target(format!("invalid prefix in CIDR '{prefix_str}': {e}")))?;

    TargetRange::from_cidr(ipv4_addr, prefix).map(Some)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
