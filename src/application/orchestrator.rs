//! Deal posting orchestration.
//!
//! The [`Orchestrator`] owns the service lifecycle: it initializes the
//! collaborators once, then runs discovery cycles until the shutdown signal
//! fires. Each cycle walks the discovered deals in order through the posting
//! pipeline (duplicate check, render, publish, persist, throttle).
//!
//! Failures are contained at two levels. A failure for a single deal is
//! logged and the batch continues. A failure of the cycle itself (proxy
//! acquisition, discovery) is logged and followed by a fixed cooldown before
//! the next cycle. Only initialization errors escape [`Orchestrator::run_forever`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::render::MessageRenderer;
use crate::domain::Deal;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{DealDiscovery, DealStore, ProxySource, Publisher};

/// Lifecycle phase of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Constructed; `initialize` has not completed.
    Starting,
    /// Running discovery cycles.
    Cycling,
    /// Shutdown observed; no new work is started.
    Stopping,
    /// Terminal.
    Stopped,
}

/// Result of pushing one deal through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// Published and recorded.
    Posted,
    /// Already announced at this exact price; skipped.
    Duplicate,
    /// The messaging platform did not accept the message.
    DeliveryFailed,
    /// Any other failure while checking, rendering or recording the deal.
    Failed,
}

/// Per-cycle tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub discovered: usize,
    pub posted: usize,
    pub duplicates: usize,
    pub failed: usize,
    /// Deals left unprocessed because shutdown was observed mid-batch.
    pub skipped: usize,
}

/// The external subsystems the orchestrator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub proxies: Arc<dyn ProxySource>,
    pub discovery: Arc<dyn DealDiscovery>,
    pub store: Arc<dyn DealStore>,
    pub publisher: Arc<dyn Publisher>,
}

/// Main service loop.
pub struct Orchestrator {
    config: Arc<Config>,
    renderer: MessageRenderer,
    collaborators: Collaborators,
    shutdown: watch::Receiver<bool>,
    phase: RunPhase,
}

impl Orchestrator {
    /// Create an orchestrator. `shutdown` is the run flag: once it reads
    /// `true` the loop winds down.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        collaborators: Collaborators,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let renderer = MessageRenderer::from_config(&config.affiliate);
        Self {
            config,
            renderer,
            collaborators,
            shutdown,
            phase: RunPhase::Starting,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// True until the shutdown signal has been raised.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !*self.shutdown.borrow()
    }

    /// Prepare collaborators: readies the proxy source, then prunes deal
    /// history older than the retention window.
    ///
    /// # Errors
    /// Any failure here is fatal to startup.
    pub async fn initialize(&mut self) -> Result<()> {
        self.collaborators.proxies.initialize().await?;
        info!("Proxy source ready");

        let retention_days = self.config.database.retention_days;
        let pruned = self.collaborators.store.prune(retention_days).await?;
        info!(retention_days, pruned, "Pruned deal history");

        Ok(())
    }

    /// Run cycles until shutdown is signalled.
    ///
    /// # Errors
    /// Returns an error only if initialization fails; cycle failures are
    /// logged and retried after the cooldown.
    pub async fn run_forever(mut self) -> Result<()> {
        info!(
            channel = %self.config.telegram.channel_id,
            interval_minutes = self.config.scraping.update_interval_minutes,
            "Starting deal poster"
        );
        self.initialize().await?;
        self.phase = RunPhase::Cycling;

        while self.is_running() {
            match self.run_cycle().await {
                Ok(report) => {
                    info!(
                        discovered = report.discovered,
                        posted = report.posted,
                        duplicates = report.duplicates,
                        failed = report.failed,
                        "Posted {} new deals",
                        report.posted
                    );
                    if self.is_running() {
                        let interval = self.config.scraping.update_interval();
                        debug!(seconds = interval.as_secs(), "Waiting for next cycle");
                        self.pause(interval).await;
                    }
                }
                Err(e) => {
                    let cooldown = self.config.scraping.error_cooldown();
                    error!(
                        error = %e,
                        cooldown_secs = cooldown.as_secs(),
                        "Cycle failed"
                    );
                    self.pause(cooldown).await;
                }
            }
        }

        self.phase = RunPhase::Stopping;
        info!("Shutdown signal observed");
        self.phase = RunPhase::Stopped;
        info!("Deal poster shutdown complete");
        Ok(())
    }

    /// Run one discovery-and-posting pass.
    ///
    /// # Errors
    /// Returns an error if proxy acquisition or discovery fails.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let mut report = CycleReport::default();
        if !self.is_running() {
            return Ok(report);
        }

        let proxies = Arc::clone(&self.collaborators.proxies);
        let handle = proxies.acquire().await?;
        debug!(proxy = ?handle, "Acquired egress");

        let deals = match self
            .collaborators
            .discovery
            .discover(&handle, &self.config)
            .await
        {
            Ok(deals) => deals,
            Err(e) => {
                proxies.report_failure(&handle);
                return Err(e);
            }
        };
        report.discovered = deals.len();
        info!(count = deals.len(), "Found potential deals");

        for (index, deal) in deals.iter().enumerate() {
            if !self.is_running() {
                report.skipped = deals.len() - index;
                info!(remaining = report.skipped, "Stopping mid-batch");
                break;
            }

            match self.process_deal(deal).await {
                PostOutcome::Posted => {
                    report.posted += 1;
                    let delay = self.config.scraping.request_delay.min_duration();
                    self.pause(delay).await;
                }
                PostOutcome::Duplicate => report.duplicates += 1,
                PostOutcome::DeliveryFailed | PostOutcome::Failed => report.failed += 1,
            }
        }

        Ok(report)
    }

    /// Push one deal through dedup, render, publish and persist.
    ///
    /// Never fails: every error is logged and folded into the outcome.
    pub async fn process_deal(&self, deal: &Deal) -> PostOutcome {
        let store = &self.collaborators.store;
        match store.is_duplicate(deal.id(), deal.sale_price()).await {
            Ok(true) => {
                debug!(
                    product_id = %deal.id(),
                    sale_price = %deal.sale_price(),
                    "Already posted at this price"
                );
                return PostOutcome::Duplicate;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(product_id = %deal.id(), error = %e, "Duplicate check failed");
                return PostOutcome::Failed;
            }
        }

        match self.post_deal(deal).await {
            Ok(()) => {
                info!(
                    product_id = %deal.id(),
                    sale_price = %deal.sale_price(),
                    "Deal posted"
                );
                PostOutcome::Posted
            }
            Err(e) if e.is_delivery() => {
                error!(product_id = %deal.id(), error = %e, "Telegram delivery failed");
                PostOutcome::DeliveryFailed
            }
            Err(e) => {
                error!(product_id = %deal.id(), error = %e, "Error posting deal");
                PostOutcome::Failed
            }
        }
    }

    async fn post_deal(&self, deal: &Deal) -> Result<()> {
        let stats = self.collaborators.store.stats(deal.id()).await?;
        let message = self.renderer.render(deal, stats.as_ref(), &Local::now());

        self.collaborators
            .publisher
            .send(&self.config.telegram.channel_id, &message)
            .await?;

        self.collaborators.store.upsert(deal).await
    }

    /// Sleep for `duration`, returning early if shutdown is signalled.
    async fn pause(&mut self, duration: Duration) {
        if duration.is_zero() || !self.is_running() {
            return;
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => {}
            () = wait_for_shutdown(&mut self.shutdown) => {}
        }
    }
}

/// Resolve once the run flag reads `true`. A closed channel can never be
/// raised, so it never resolves.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let closed = shutdown.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}
