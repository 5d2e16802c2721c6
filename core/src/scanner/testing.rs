//! Scripted prober for engine tests.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::probe::Prober;

/// Answers `true` for a fixed set of (host, port) pairs and records every
/// call it receives.
pub(crate) struct FakeProber {
    open: HashSet<(Ipv4Addr, u16)>,
    delay: Duration,
    panic_on: Option<Ipv4Addr>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    order: Mutex<HashMap<Ipv4Addr, Vec<u16>>>,
}

impl FakeProber {
    pub(crate) fn new<I>(open: I) -> Self
    where
        I: IntoIterator<Item = (Ipv4Addr, u16)>,
    {
        Self {
            open: open.into_iter().collect(),
            delay: Duration::ZERO,
            panic_on: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            order: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn panicking_on(mut self, host: Ipv4Addr) -> Self {
        self.panic_on = Some(host);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of probes that were running at the same moment.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn probe_order(&self, host: Ipv4Addr) -> Vec<u16> {
        self.order
            .lock()
            .unwrap()
            .get(&host)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, host: Ipv4Addr, port: u16, _timeout: Duration) -> bool {
        if self.panic_on == Some(host) {
            panic!("scripted failure on {host}");
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().entry(host).or_default().push(port);

        let now: usize = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.open.contains(&(host, port))
    }
}
