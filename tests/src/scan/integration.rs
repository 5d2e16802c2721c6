#![cfg(test)]
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::time::Duration;

use sweepr_common::config::ScanConfig;
use sweepr_common::error::SetupError;
use sweepr_common::network::ports::PortSet;
use sweepr_common::network::range::TargetRange;
use sweepr_core::scanner::{self, ScanCoordinator};
use sweepr_core::session::SessionState;
use tokio::net::TcpListener;

use tempfile::TempDir;

use crate::utils::{Console, ScriptedProber, log_path, read_lines};

fn config(targets: TargetRange, ports: &[u16], scratch: &TempDir) -> ScanConfig {
    ScanConfig::new(targets, PortSet::new(ports.iter().copied()).unwrap())
        .with_log_path(log_path(scratch))
}

/// Three hosts, two ports, one open pair: exactly one line in the log and
/// exactly one echo on the console.
#[tokio::test]
async fn scan_reports_only_open_pair() {
    let scratch = TempDir::new().unwrap();
    let open_host: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);
    let prober = ScriptedProber::new([(open_host, 80)]);
    let console = Console::default();

    let cfg = config("10.0.0.1-3".parse().unwrap(), &[22, 80], &scratch);
    let report = ScanCoordinator::new(cfg, prober.clone())
        .unwrap()
        .with_echo(console.echo())
        .run()
        .await
        .unwrap();

    assert_eq!(report.state, SessionState::Completed);
    assert_eq!(report.hosts_total, 3);
    assert_eq!(report.hosts_completed, 3);
    assert!(!report.cancelled);
    assert_eq!(prober.calls(), 6);

    let expected = vec!["[!] Open Port Detected: 10.0.0.2:80".to_string()];
    assert_eq!(read_lines(&log_path(&scratch)), expected);
    assert_eq!(console.lines(), expected);
    assert_eq!(report.open_ports(), 1);
}

#[tokio::test]
async fn scan_without_open_ports_leaves_empty_log() {
    let scratch = TempDir::new().unwrap();
    let prober = ScriptedProber::all_closed();

    let cfg = config("10.0.0.1-20".parse().unwrap(), &[21, 22, 23], &scratch);
    let report = ScanCoordinator::new(cfg, prober.clone())
        .unwrap()
        .with_echo(|_| {})
        .run()
        .await
        .unwrap();

    assert_eq!(report.state, SessionState::Completed);
    assert_eq!(report.open_ports(), 0);
    assert_eq!(prober.calls(), 60);
    assert_eq!(std::fs::read_to_string(log_path(&scratch)).unwrap(), "");
}

#[tokio::test]
async fn blocked_log_directory_aborts_before_probing() {
    let scratch = TempDir::new().unwrap();
    let blocker = scratch.path().join("outputs");
    std::fs::write(&blocker, "not a directory").unwrap();

    let prober = ScriptedProber::new([(Ipv4Addr::new(10, 0, 0, 1), 22)]);
    let cfg = config("10.0.0.1-3".parse().unwrap(), &[22], &scratch);

    let result = ScanCoordinator::new(cfg, prober.clone())
        .unwrap()
        .with_echo(|_| {})
        .run()
        .await;

    assert!(
        matches!(result, Err(SetupError::CreateDir { .. })),
        "expected a directory error, got {result:?}"
    );
    assert_eq!(prober.calls(), 0, "no probe may be sent after a setup failure");
    assert!(!log_path(&scratch).exists());
}

#[tokio::test]
async fn rerun_truncates_previous_log() {
    let scratch = TempDir::new().unwrap();
    std::fs::create_dir_all(log_path(&scratch).parent().unwrap()).unwrap();
    std::fs::write(log_path(&scratch), "[!] Open Port Detected: 10.9.9.9:1\n").unwrap();

    let prober = ScriptedProber::new([(Ipv4Addr::new(10, 0, 0, 1), 443)]);
    let cfg = config("10.0.0.1".parse().unwrap(), &[443], &scratch);
    ScanCoordinator::new(cfg, prober)
        .unwrap()
        .with_echo(|_| {})
        .run()
        .await
        .unwrap();

    assert_eq!(
        read_lines(&log_path(&scratch)),
        vec!["[!] Open Port Detected: 10.0.0.1:443".to_string()]
    );
}

/// Every host has both ports open and probes are slow enough to overlap, so
/// many tasks contend for the log at once.
#[tokio::test]
async fn concurrent_hosts_write_whole_lines() {
    let scratch = TempDir::new().unwrap();
    let targets: TargetRange = "10.0.0.1-100".parse().unwrap();
    let open: Vec<(Ipv4Addr, u16)> = targets
        .hosts()
        .flat_map(|host| [(host, 22), (host, 80)])
        .collect();
    let prober = ScriptedProber::new(open.clone()).with_delay(Duration::from_millis(2));

    let cfg = config(targets, &[22, 80], &scratch).with_max_concurrent_hosts(32);
    let report = ScanCoordinator::new(cfg, prober)
        .unwrap()
        .with_echo(|_| {})
        .run()
        .await
        .unwrap();

    let lines = read_lines(&log_path(&scratch));
    assert_eq!(lines.len(), 200);
    assert_eq!(report.open_ports(), 200);

    let logged: BTreeSet<String> = lines.into_iter().collect();
    let expected: BTreeSet<String> = open
        .iter()
        .map(|(host, port)| format!("[!] Open Port Detected: {host}:{port}"))
        .collect();
    assert_eq!(logged, expected);
}

#[tokio::test]
async fn loopback_scan_finds_listening_ports() {
    let scratch = TempDir::new().unwrap();
    let first = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let second = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let closed = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();

    let first_port: u16 = first.local_addr().unwrap().port();
    let second_port: u16 = second.local_addr().unwrap().port();
    let closed_port: u16 = closed.local_addr().unwrap().port();
    drop(closed);

    let cfg = config(
        "127.0.0.1".parse().unwrap(),
        &[second_port, closed_port, first_port],
        &scratch,
    )
    .with_timeout(Duration::from_millis(500));

    let report = scanner::run_scan(cfg).await.unwrap();

    // One host means one task, so log order follows port order.
    assert_eq!(
        read_lines(&log_path(&scratch)),
        vec![
            format!("[!] Open Port Detected: 127.0.0.1:{second_port}"),
            format!("[!] Open Port Detected: 127.0.0.1:{first_port}"),
        ]
    );
    assert_eq!(report.open_ports(), 2);
    assert_eq!(report.log_path.as_deref(), Some(log_path(&scratch).as_path()));
}

#[tokio::test]
async fn repeated_scans_agree_on_findings() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port: u16 = listener.local_addr().unwrap().port();
    let targets: TargetRange = "127.0.0.1-3".parse().unwrap();

    let mut runs: Vec<BTreeSet<String>> = Vec::new();
    for _ in 0..2 {
        let scratch = TempDir::new().unwrap();
        let cfg = config(targets, &[port], &scratch).with_timeout(Duration::from_millis(500));
        ScanCoordinator::tcp(cfg)
            .unwrap()
            .with_echo(|_| {})
            .run()
            .await
            .unwrap();
        runs.push(read_lines(&log_path(&scratch)).into_iter().collect());
    }

    assert_eq!(runs[0], runs[1]);
    assert!(runs[0].contains(&format!("[!] Open Port Detected: 127.0.0.1:{port}")));
}

#[tokio::test]
async fn stop_signal_ends_session_early() {
    let scratch = TempDir::new().unwrap();
    let prober = ScriptedProber::all_closed().with_delay(Duration::from_millis(50));

    let cfg = config("10.0.0.1-200".parse().unwrap(), &[22, 80], &scratch)
        .with_max_concurrent_hosts(4);
    let coordinator = ScanCoordinator::new(cfg, prober.clone())
        .unwrap()
        .with_echo(|_| {});
    let stop = coordinator.stop_signal();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        stop.stop();
    });

    let report = coordinator.run().await.unwrap();

    assert!(report.cancelled);
    assert_eq!(report.state, SessionState::Completed);
    assert!(report.hosts_dispatched < 200);
    assert_eq!(report.hosts_completed, report.hosts_dispatched);
    assert!(prober.calls() < 400);
}
