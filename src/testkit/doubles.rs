//! Deterministic collaborator doubles.
//!
//! - [`StaticProxySource`] - Hands out a direct handle; counts calls and can
//!   be told to fail initialization or the first N acquisitions.
//! - [`ScriptedDiscovery`] - Pops pre-loaded batches; optionally raises the
//!   stop signal once the script runs out.
//! - [`MemoryDealStore`] - In-memory store with the same keying as the SQLite
//!   store; records the calls made against it.
//! - [`RecordingPublisher`] - Records every send with its (tokio) timestamp;
//!   scripted failures; optionally raises the stop signal after N sends.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::domain::{Deal, DealStats, ProductId};
use crate::error::{Error, Result};
use crate::infrastructure::config::Config;
use crate::port::{DealDiscovery, DealStore, ProxyHandle, ProxySource, PublishError, Publisher};

// ---------------------------------------------------------------------------
// StaticProxySource
// ---------------------------------------------------------------------------

/// Proxy source with a single direct handle.
#[derive(Default)]
pub struct StaticProxySource {
    fail_initialize: bool,
    failing_acquires: AtomicUsize,
    initialized: AtomicUsize,
    acquired: AtomicUsize,
    reported: AtomicUsize,
}

impl StaticProxySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose `initialize` always fails.
    pub fn failing() -> Self {
        Self {
            fail_initialize: true,
            ..Self::default()
        }
    }

    /// A source whose first `n` `acquire` calls fail.
    pub fn failing_acquire(n: usize) -> Self {
        Self {
            failing_acquires: AtomicUsize::new(n),
            ..Self::default()
        }
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn acquire_calls(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn reported_failures(&self) -> usize {
        self.reported.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProxySource for StaticProxySource {
    async fn initialize(&self) -> Result<()> {
        self.initialized.fetch_add(1, Ordering::SeqCst);
        if self.fail_initialize {
            return Err(Error::Proxy("proxy subsystem unavailable".to_string()));
        }
        Ok(())
    }

    async fn acquire(&self) -> Result<ProxyHandle> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing_acquires
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(Error::Proxy("no healthy proxy available".to_string()));
        }
        Ok(ProxyHandle::direct(reqwest::Client::new()))
    }

    fn report_failure(&self, _handle: &ProxyHandle) {
        self.reported.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// ScriptedDiscovery
// ---------------------------------------------------------------------------

/// Discovery double that replays a fixed script of batches and failures.
///
/// Once the script is exhausted every call returns an empty batch, after
/// raising the stop signal if one was attached.
pub struct ScriptedDiscovery {
    script: Mutex<VecDeque<Result<Vec<Deal>>>>,
    calls: Mutex<Vec<Instant>>,
    stop: Option<watch::Sender<bool>>,
}

impl ScriptedDiscovery {
    pub fn new(script: Vec<Result<Vec<Deal>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            stop: None,
        }
    }

    /// Raise `stop` once the script has been fully replayed.
    pub fn stop_when_exhausted(mut self, stop: watch::Sender<bool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// A discovery failure for use in scripts.
    pub fn failure(message: &str) -> Result<Vec<Deal>> {
        Err(Error::Discovery(message.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// When each `discover` call happened.
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl DealDiscovery for ScriptedDiscovery {
    async fn discover(&self, _handle: &ProxyHandle, _config: &Config) -> Result<Vec<Deal>> {
        self.calls.lock().push(Instant::now());
        let next = self.script.lock().pop_front();
        match next {
            Some(result) => result,
            None => {
                if let Some(stop) = &self.stop {
                    let _ = stop.send(true);
                }
                Ok(Vec::new())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryDealStore
// ---------------------------------------------------------------------------

/// In-memory deal store keyed by (product id, normalized sale price).
#[derive(Default)]
pub struct MemoryDealStore {
    rows: Mutex<BTreeMap<(String, Decimal), Deal>>,
    prunes: Mutex<Vec<u32>>,
    duplicate_checks: AtomicUsize,
    fail_upsert: bool,
}

impl MemoryDealStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `upsert` always fails.
    pub fn failing_upsert() -> Self {
        Self {
            fail_upsert: true,
            ..Self::default()
        }
    }

    /// Seed a previously announced deal.
    pub fn seed(&self, deal: &Deal) {
        self.rows.lock().insert(key(deal.id(), deal.sale_price()), deal.clone());
    }

    /// Number of recorded (product, price) rows.
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str, sale_price: Decimal) -> bool {
        self.rows
            .lock()
            .contains_key(&key(&ProductId::new(id), sale_price))
    }

    /// Retention windows passed to `prune`, in call order.
    pub fn prune_calls(&self) -> Vec<u32> {
        self.prunes.lock().clone()
    }

    pub fn duplicate_checks(&self) -> usize {
        self.duplicate_checks.load(Ordering::SeqCst)
    }
}

fn key(id: &ProductId, sale_price: Decimal) -> (String, Decimal) {
    (id.to_string(), sale_price.normalize())
}

#[async_trait]
impl DealStore for MemoryDealStore {
    async fn prune(&self, retention_days: u32) -> Result<usize> {
        self.prunes.lock().push(retention_days);
        Ok(0)
    }

    async fn is_duplicate(&self, id: &ProductId, sale_price: Decimal) -> Result<bool> {
        self.duplicate_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().contains_key(&key(id, sale_price)))
    }

    async fn stats(&self, id: &ProductId) -> Result<Option<DealStats>> {
        let rows = self.rows.lock();
        let prices: Vec<Decimal> = rows
            .keys()
            .filter(|(product, _)| product == id.as_str())
            .map(|(_, price)| *price)
            .collect();

        Ok(prices.iter().min().map(|lowest| DealStats {
            id: id.clone(),
            lowest_price_seen: *lowest,
            times_posted: u32::try_from(prices.len()).unwrap_or(u32::MAX),
        }))
    }

    async fn upsert(&self, deal: &Deal) -> Result<()> {
        if self.fail_upsert {
            return Err(Error::Database("disk I/O error".to_string()));
        }
        self.seed(deal);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingPublisher
// ---------------------------------------------------------------------------

/// A message captured by [`RecordingPublisher`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel: String,
    pub text: String,
    pub at: Instant,
}

/// Publisher double that records every attempt.
///
/// Each `send` pops the next scripted result (defaults to `Ok(())` when the
/// script is exhausted). Failed attempts are recorded too.
#[derive(Default)]
pub struct RecordingPublisher {
    script: Mutex<VecDeque<std::result::Result<(), PublishError>>>,
    sent: Mutex<Vec<SentMessage>>,
    stop_after: Option<(usize, watch::Sender<bool>)>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, results: Vec<std::result::Result<(), PublishError>>) -> Self {
        self.script = Mutex::new(results.into());
        self
    }

    /// Raise `stop` during the `n`th send attempt.
    pub fn stop_after(mut self, n: usize, stop: watch::Sender<bool>) -> Self {
        self.stop_after = Some((n, stop));
        self
    }

    /// Every send attempt, in order.
    pub fn attempts(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn send(&self, channel: &str, text: &str) -> std::result::Result<(), PublishError> {
        let attempts = {
            let mut sent = self.sent.lock();
            sent.push(SentMessage {
                channel: channel.to_string(),
                text: text.to_string(),
                at: Instant::now(),
            });
            sent.len()
        };

        if let Some((n, stop)) = &self.stop_after {
            if attempts >= *n {
                let _ = stop.send(true);
            }
        }

        self.script.lock().pop_front().unwrap_or(Ok(()))
    }
}
