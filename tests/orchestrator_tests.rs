//! Orchestrator integration tests.
//!
//! Drive the posting loop with testkit doubles on a paused tokio clock so
//! throttle, interval and cooldown timing can be asserted exactly.

use std::sync::Arc;
use std::time::Duration;

use dealcast::application::{CycleReport, Orchestrator, PostOutcome, RunPhase};
use dealcast::error::Error;
use dealcast::infrastructure::config::Config;
use dealcast::port::PublishError;
use dealcast::testkit;
use dealcast::testkit::doubles::{
    MemoryDealStore, RecordingPublisher, ScriptedDiscovery, StaticProxySource,
};
use dealcast::testkit::domain::{batch, deal};
use rust_decimal_macros::dec;
use tokio::sync::watch;
use tokio::time::Instant;

struct Harness {
    proxies: Arc<StaticProxySource>,
    discovery: Arc<ScriptedDiscovery>,
    store: Arc<MemoryDealStore>,
    publisher: Arc<RecordingPublisher>,
}

impl Harness {
    fn new(discovery: ScriptedDiscovery) -> Self {
        Self {
            proxies: Arc::new(StaticProxySource::new()),
            discovery: Arc::new(discovery),
            store: Arc::new(MemoryDealStore::new()),
            publisher: Arc::new(RecordingPublisher::new()),
        }
    }

    fn with_store(mut self, store: MemoryDealStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    fn with_publisher(mut self, publisher: RecordingPublisher) -> Self {
        self.publisher = Arc::new(publisher);
        self
    }

    fn with_proxies(mut self, proxies: StaticProxySource) -> Self {
        self.proxies = Arc::new(proxies);
        self
    }

    fn orchestrator(&self, shutdown: watch::Receiver<bool>) -> Orchestrator {
        self.orchestrator_with(testkit::config::config(), shutdown)
    }

    fn orchestrator_with(&self, config: Config, shutdown: watch::Receiver<bool>) -> Orchestrator {
        let collaborators =
            testkit::collaborators(&self.proxies, &self.discovery, &self.store, &self.publisher);
        Orchestrator::new(Arc::new(config), collaborators, shutdown)
    }

    fn gaps(&self) -> Vec<Duration> {
        let attempts = self.publisher.attempts();
        attempts
            .windows(2)
            .map(|pair| pair[1].at - pair[0].at)
            .collect()
    }
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

#[tokio::test(start_paused = true)]
async fn initialize_readies_proxies_then_prunes() {
    let harness = Harness::new(ScriptedDiscovery::new(vec![]));
    let (_stop, rx) = watch::channel(false);
    let mut orchestrator = harness.orchestrator(rx);

    assert_eq!(orchestrator.phase(), RunPhase::Starting);
    orchestrator.initialize().await.unwrap();

    assert_eq!(harness.proxies.initialize_calls(), 1);
    assert_eq!(harness.store.prune_calls(), vec![30]);
}

#[tokio::test(start_paused = true)]
async fn proxy_init_failure_aborts_before_any_cycle() {
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(batch(3))]))
        .with_proxies(StaticProxySource::failing());
    let (_stop, rx) = watch::channel(false);

    let result = harness.orchestrator(rx).run_forever().await;

    assert!(matches!(result, Err(Error::Proxy(_))));
    assert!(harness.store.prune_calls().is_empty());
    assert_eq!(harness.proxies.acquire_calls(), 0);
    assert_eq!(harness.discovery.call_count(), 0);
    assert_eq!(harness.publisher.attempt_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn duplicate_at_same_price_is_skipped() {
    let store = MemoryDealStore::new();
    store.seed(&deal("P0", dec!(50.00)));
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(vec![
        deal("P0", dec!(50.00)),
        deal("P1", dec!(50.00)),
    ])]))
    .with_store(store);
    let (_stop, rx) = watch::channel(false);

    let report = harness.orchestrator(rx).run_cycle().await.unwrap();

    assert_eq!(
        report,
        CycleReport {
            discovered: 2,
            posted: 1,
            duplicates: 1,
            failed: 0,
            skipped: 0,
        }
    );
    let attempts = harness.publisher.attempts();
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].text.contains("/dp/P1?tag=testtag-20"));
    assert_eq!(harness.store.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn duplicate_check_ignores_trailing_zeros() {
    let store = MemoryDealStore::new();
    store.seed(&deal("P0", dec!(19.9)));
    let harness = Harness::new(ScriptedDiscovery::new(vec![])).with_store(store);
    let (_stop, rx) = watch::channel(false);

    let outcome = harness
        .orchestrator(rx)
        .process_deal(&deal("P0", dec!(19.90)))
        .await;

    assert_eq!(outcome, PostOutcome::Duplicate);
    assert_eq!(harness.publisher.attempt_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn price_drop_is_reannounced() {
    let store = MemoryDealStore::new();
    store.seed(&deal("P0", dec!(50.00)));
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(vec![deal("P0", dec!(40.00))])]))
        .with_store(store);
    let (_stop, rx) = watch::channel(false);

    let report = harness.orchestrator(rx).run_cycle().await.unwrap();

    assert_eq!(report.posted, 1);
    assert_eq!(report.duplicates, 0);
    assert!(harness.store.contains("P0", dec!(40.00)));
    assert!(harness.store.contains("P0", dec!(50.00)));
}

#[tokio::test(start_paused = true)]
async fn history_block_appears_once_product_has_repeat_history() {
    let harness = Harness::new(ScriptedDiscovery::new(vec![
        Ok(vec![deal("P0", dec!(50.00))]),
        Ok(vec![deal("P0", dec!(40.00))]),
        Ok(vec![deal("P0", dec!(45.00))]),
    ]));
    let (_stop, rx) = watch::channel(false);
    let mut orchestrator = harness.orchestrator(rx);

    for _ in 0..3 {
        assert_eq!(orchestrator.run_cycle().await.unwrap().posted, 1);
    }

    let attempts = harness.publisher.attempts();
    assert!(!attempts[0].text.contains("Lowest Price"));
    assert!(!attempts[1].text.contains("Lowest Price"));
    assert!(attempts[2]
        .text
        .contains("💹 Lowest Price: $40.00\n📊 Times Listed: 2"));
}

#[tokio::test(start_paused = true)]
async fn message_goes_to_configured_channel() {
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(vec![deal(
        "B00TEST",
        dec!(19.99),
    )])]));
    let (_stop, rx) = watch::channel(false);

    harness.orchestrator(rx).run_cycle().await.unwrap();

    let attempts = harness.publisher.attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].channel, testkit::config::CHANNEL);
    let text = &attempts[0].text;
    assert!(text.starts_with("🔥 HOT DEAL ALERT! 🔥\n\n📦 Wireless Earbuds\n\n"));
    assert!(text.contains("💰 Sale Price: $19.99\n❌ Original: $100.00\n💯 Save: 80% ($80.01)"));
    assert!(text.contains("🛍️ Buy Now: https://www.amazon.com/dp/B00TEST?tag=testtag-20"));
    assert!(text.contains("#Electronics #AmazonDeals #Discount\nPosted: "));
}

#[tokio::test(start_paused = true)]
async fn throttle_applies_only_after_successful_posts() {
    let (stop, rx) = watch::channel(false);
    let harness =
        Harness::new(ScriptedDiscovery::new(vec![Ok(batch(4))]).stop_when_exhausted(stop))
            .with_publisher(RecordingPublisher::new().with_results(vec![
                Ok(()),
                Err(PublishError::Rejected("chat not found".to_string())),
                Ok(()),
                Ok(()),
            ]));

    harness.orchestrator(rx).run_forever().await.unwrap();

    assert_eq!(harness.gaps(), vec![secs(2), secs(0), secs(2)]);
    assert!(harness.store.contains("P0", dec!(50.00)));
    assert!(!harness.store.contains("P1", dec!(50.00)));
    assert_eq!(harness.store.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn delivery_failure_is_not_persisted_and_retried_next_cycle() {
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(batch(1)), Ok(batch(1))]))
        .with_publisher(
            RecordingPublisher::new()
                .with_results(vec![Err(PublishError::Transport("timed out".to_string()))]),
        );
    let (_stop, rx) = watch::channel(false);
    let mut orchestrator = harness.orchestrator(rx);

    let first = orchestrator.run_cycle().await.unwrap();
    assert_eq!(first.failed, 1);
    assert_eq!(first.posted, 0);
    assert!(harness.store.is_empty());

    let second = orchestrator.run_cycle().await.unwrap();
    assert_eq!(second.posted, 1);
    assert_eq!(harness.store.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn persist_failure_after_publish_is_contained() {
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(batch(2))]))
        .with_store(MemoryDealStore::failing_upsert());
    let (_stop, rx) = watch::channel(false);

    let report = harness.orchestrator(rx).run_cycle().await.unwrap();

    assert_eq!(report.failed, 2);
    assert_eq!(report.posted, 0);
    assert_eq!(harness.publisher.attempt_count(), 2);
    assert_eq!(harness.gaps(), vec![secs(0)]);
}

#[tokio::test(start_paused = true)]
async fn deals_are_published_in_discovery_order() {
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(batch(3))]));
    let (_stop, rx) = watch::channel(false);

    harness.orchestrator(rx).run_cycle().await.unwrap();

    let order: Vec<bool> = harness
        .publisher
        .attempts()
        .iter()
        .enumerate()
        .map(|(i, sent)| sent.text.contains(&format!("/dp/P{i}?")))
        .collect();
    assert_eq!(order, vec![true, true, true]);
    assert_eq!(harness.store.duplicate_checks(), 3);
}

#[tokio::test(start_paused = true)]
async fn shutdown_mid_batch_stops_before_next_deal() {
    let (stop, rx) = watch::channel(false);
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(batch(5))]))
        .with_publisher(RecordingPublisher::new().stop_after(2, stop));
    let mut orchestrator = harness.orchestrator(rx);
    let start = Instant::now();

    let report = orchestrator.run_cycle().await.unwrap();

    assert_eq!(report.posted, 2);
    assert_eq!(report.skipped, 3);
    assert_eq!(harness.store.duplicate_checks(), 2);
    assert_eq!(harness.store.len(), 2);
    assert!(!orchestrator.is_running());
    // One throttle pause after the first post; none after the stop.
    assert_eq!(start.elapsed(), secs(2));

    let after = orchestrator.run_cycle().await.unwrap();
    assert_eq!(after, CycleReport::default());
    assert_eq!(harness.proxies.acquire_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_inter_cycle_pause() {
    let harness = Harness::new(ScriptedDiscovery::new(vec![Ok(batch(1))]));
    let (stop, rx) = watch::channel(false);
    let orchestrator = harness.orchestrator(rx);
    let start = Instant::now();

    let task = tokio::spawn(orchestrator.run_forever());
    tokio::time::sleep(secs(600)).await;
    stop.send(true).unwrap();
    task.await.unwrap().unwrap();

    assert_eq!(start.elapsed(), secs(600));
    assert_eq!(harness.discovery.call_count(), 1);
    assert_eq!(harness.publisher.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn discovery_failure_waits_fixed_cooldown_and_retries() {
    let (stop, rx) = watch::channel(false);
    let harness = Harness::new(
        ScriptedDiscovery::new(vec![
            ScriptedDiscovery::failure("503 Service Unavailable"),
            Ok(batch(1)),
        ])
        .stop_when_exhausted(stop),
    );

    harness.orchestrator(rx).run_forever().await.unwrap();

    let calls = harness.discovery.call_times();
    assert_eq!(calls.len(), 3);
    // Fixed 60s cooldown, then one 2s throttle plus the 30 minute interval.
    assert_eq!(calls[1] - calls[0], secs(60));
    assert_eq!(calls[2] - calls[1], secs(2 + 30 * 60));
    assert_eq!(harness.proxies.reported_failures(), 1);
    assert_eq!(harness.publisher.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn proxy_acquire_failure_waits_cooldown_and_retries() {
    let (stop, rx) = watch::channel(false);
    let discovery = ScriptedDiscovery::new(vec![Ok(batch(1))]).stop_when_exhausted(stop);
    let harness =
        Harness::new(discovery).with_proxies(StaticProxySource::failing_acquire(1));
    let start = Instant::now();

    harness.orchestrator(rx).run_forever().await.unwrap();

    let calls = harness.discovery.call_times();
    assert_eq!(calls.len(), 2);
    // The failed acquisition never reached discovery; the retry came after 60s.
    assert_eq!(calls[0] - start, secs(60));
    assert_eq!(harness.proxies.acquire_calls(), 3);
    assert_eq!(harness.proxies.reported_failures(), 0);
    assert_eq!(harness.publisher.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cooldown_is_configurable_and_does_not_grow() {
    let (stop, rx) = watch::channel(false);
    let harness = Harness::new(
        ScriptedDiscovery::new(vec![
            ScriptedDiscovery::failure("connection reset"),
            ScriptedDiscovery::failure("connection reset"),
            ScriptedDiscovery::failure("connection reset"),
        ])
        .stop_when_exhausted(stop),
    );
    let mut config = testkit::config::config();
    config.scraping.error_cooldown_secs = 5;

    harness.orchestrator_with(config, rx).run_forever().await.unwrap();

    let calls = harness.discovery.call_times();
    let gaps: Vec<Duration> = calls.windows(2).map(|pair| pair[1] - pair[0]).collect();
    assert_eq!(gaps, vec![secs(5), secs(5), secs(5)]);
}

#[tokio::test(start_paused = true)]
async fn empty_batch_waits_full_interval() {
    let (stop, rx) = watch::channel(false);
    let harness = Harness::new(
        ScriptedDiscovery::new(vec![Ok(vec![]), Ok(vec![])]).stop_when_exhausted(stop),
    );

    harness.orchestrator(rx).run_forever().await.unwrap();

    let calls = harness.discovery.call_times();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1] - calls[0], secs(30 * 60));
    assert_eq!(calls[2] - calls[1], secs(30 * 60));
    assert_eq!(harness.publisher.attempt_count(), 0);
}
