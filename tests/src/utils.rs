use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::finding::Finding;
use sweepr_core::probe::Prober;
use tempfile::TempDir;

/// Log location inside a scratch directory, two levels deep so the sink
/// has to create the parents.
pub fn log_path(dir: &TempDir) -> PathBuf {
    dir.path().join("outputs/logs/netscan.log")
}

/// Prober answering from a fixed table of open (host, port) pairs.
#[derive(Clone)]
pub struct ScriptedProber {
    open: Arc<HashSet<(Ipv4Addr, u16)>>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProber {
    pub fn new<I>(open: I) -> Self
    where
        I: IntoIterator<Item = (Ipv4Addr, u16)>,
    {
        Self {
            open: Arc::new(open.into_iter().collect()),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn all_closed() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, host: Ipv4Addr, port: u16, _timeout: Duration) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.open.contains(&(host, port))
    }
}

/// Collects echoed findings the way an operator would see them.
#[derive(Clone, Default)]
pub struct Console {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Console {
    pub fn echo(&self) -> impl Fn(&Finding) + Send + Sync + 'static {
        let lines = self.lines.clone();
        move |finding: &Finding| lines.lock().unwrap().push(finding.to_string())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
