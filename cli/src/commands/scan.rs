use std::time::Duration;

use colored::*;
use tracing::{Instrument, info, info_span, warn};

use crate::terminal::{colors, format, print, spinner};
use sweepr_common::config::{Config, ScanConfig};
use sweepr_core::scanner::ScanCoordinator;
use sweepr_core::session::ScanReport;
use sweepr_core::signal::StopSignal;

pub async fn scan(scan_cfg: ScanConfig, cfg: &Config) -> anyhow::Result<()> {
    print_settings(&scan_cfg, cfg);

    print::notice(&format!("Starting network scan on {}", scan_cfg.targets));

    let stop = StopSignal::new();
    watch_for_interrupt(stop.clone());

    let span = info_span!("scan", indicatif.pb_show = true);
    spinner::attach(&span);
    let progress_span = span.clone();

    let coordinator = ScanCoordinator::tcp(scan_cfg)?
        .with_stop_signal(stop)
        .with_echo(|finding| print::print(&finding.to_string()))
        .on_progress(move |progress| spinner::report_progress(&progress_span, progress));

    let report: ScanReport = coordinator.run().instrument(span.clone()).await?;
    drop(span);

    scan_ends(&report, cfg);
    Ok(())
}

fn watch_for_interrupt(stop: StopSignal) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, letting in-flight probes settle...");
            stop.stop();
        }
    });
}

fn print_settings(scan_cfg: &ScanConfig, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    print::section("scan settings", cfg.quiet);
    print::settings(&[
        ("Targets", format!("{} ({} hosts)", scan_cfg.targets, scan_cfg.targets.len())),
        ("Ports", scan_cfg.ports.to_string()),
        ("Timeout", format!("{} ms", scan_cfg.timeout.as_millis())),
        ("Concurrency", scan_cfg.max_concurrent_hosts.to_string()),
        ("Log file", scan_cfg.log_path.display().to_string()),
    ]);
    print::section("scanning", cfg.quiet);
}

fn scan_ends(report: &ScanReport, cfg: &Config) {
    if report.cancelled {
        warn!(
            "Scan interrupted: {} of {} hosts finished",
            report.hosts_completed, report.hosts_total
        );
    }

    if report.write_errors > 0 {
        warn!("{} findings could not be written to the log", report.write_errors);
    }

    if report.findings.is_empty() {
        no_ports_found(cfg);
    } else {
        print::section("Open Ports", cfg.quiet);
        print_hosts(report, cfg);
    }

    print_summary(report, report.elapsed, cfg);
}

fn no_ports_found(cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }
    print::section("Zero open ports detected", cfg.quiet);
    print::no_open_ports();
}

fn print_hosts(report: &ScanReport, cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    let grouped = format::group_by_host(&report.findings);
    for (idx, (host, ports)) in grouped.iter().enumerate() {
        print::host_tree(idx, *host, &format::port_details(ports));
        if idx + 1 != grouped.len() {
            print::blank();
        }
    }
}

fn print_summary(report: &ScanReport, total_time: Duration, cfg: &Config) {
    let open_ports: ColoredString = format!("{} open ports", report.open_ports()).bold().green();
    let hosts: ColoredString = format!("{} hosts", report.hosts_completed).bold().cyan();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString = &format!("Scan Complete: {open_ports} across {hosts} in {total_time}")
        .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => print::summary(&output.to_string()),
        _ => info!("{}", output),
    }

    if let Some(path) = &report.log_path {
        info!("Network scan completed. Results saved to: {}", path.display());
    }
}
