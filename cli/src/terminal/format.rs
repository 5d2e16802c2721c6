use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use colored::*;
use sweepr_common::finding::Finding;
use sweepr_common::network::services;

use crate::terminal::colors;

/// Groups findings per host, both hosts and ports ascending.
pub fn group_by_host(findings: &[Finding]) -> BTreeMap<Ipv4Addr, Vec<u16>> {
    let mut grouped: BTreeMap<Ipv4Addr, Vec<u16>> = BTreeMap::new();
    for finding in findings {
        grouped.entry(finding.host).or_default().push(finding.port);
    }
    for ports in grouped.values_mut() {
        ports.sort_unstable();
        ports.dedup();
    }
    grouped
}

/// One tree entry per open port, labelled with its well-known service.
pub fn port_details(ports: &[u16]) -> Vec<(String, ColoredString)> {
    ports
        .iter()
        .map(|port| {
            let service: ColoredString = match services::service_name(*port) {
                Some(name) => name.color(colors::SERVICE),
                None => "unknown".dimmed(),
            };
            (port.to_string(), service)
        })
        .collect()
}
