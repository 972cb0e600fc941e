//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::adapter::outbound::amazon::DealFeedClient;
use crate::adapter::outbound::log::LogPublisher;
use crate::adapter::outbound::proxy::ProxyPool;
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::SqliteDealStore;
use crate::adapter::outbound::telegram::TelegramPublisher;
use crate::application::orchestrator::{Collaborators, Orchestrator};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{DealStore, Publisher};

/// Open the deal history database and apply pending migrations.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn build_store(config: &Config) -> Result<Arc<dyn DealStore>> {
    let pool = create_pool(&config.database.url())?;
    run_migrations(&pool)?;
    info!(database = %config.database.path, "Database initialized");
    Ok(Arc::new(SqliteDealStore::new(pool)))
}

/// Build the message publisher: Telegram, or the log in dry-run mode.
#[must_use]
pub fn build_publisher(config: &Config) -> Arc<dyn Publisher> {
    if config.dry_run {
        info!("Dry-run mode: messages will be logged, not published");
        Arc::new(LogPublisher)
    } else {
        Arc::new(TelegramPublisher::new(&config.telegram.bot_token))
    }
}

/// Build the production collaborators for `config`.
///
/// # Errors
/// Returns an error if the deal store cannot be opened.
pub fn build_collaborators(config: &Config) -> Result<Collaborators> {
    Ok(Collaborators {
        proxies: Arc::new(ProxyPool::from_config(&config.scraping)),
        discovery: Arc::new(DealFeedClient::new()),
        store: build_store(config)?,
        publisher: build_publisher(config),
    })
}

/// Wire the production orchestrator and run it until `shutdown` fires.
///
/// # Errors
/// Returns an error if wiring or initialization fails.
pub async fn run(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    let collaborators = build_collaborators(&config)?;
    Orchestrator::new(Arc::new(config), collaborators, shutdown)
        .run_forever()
        .await
}
