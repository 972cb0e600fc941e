//! Dealcast - discount deal discovery and Telegram posting.
//!
//! The service polls a deal feed through a rotating proxy pool, filters out
//! deals already announced at the same price, renders an affiliate-tagged
//! message for each new deal and publishes it to a Telegram channel. Posting
//! history lives in SQLite so price drops are re-announced with the lowest
//! price seen.
//!
//! # Modules
//!
//! - [`domain`] - Deals, product ids and posting statistics
//! - [`port`] - Collaborator traits: proxies, discovery, storage, publishing
//! - [`application`] - Message rendering and the posting orchestrator
//! - [`adapter`] - Production collaborators and the CLI
//! - [`infrastructure`] - Configuration and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Deterministic collaborator doubles for tests
//!
//! # Example
//!
//! ```no_run
//! use dealcast::infrastructure::bootstrap;
//! use dealcast::infrastructure::config::Config;
//!
//! # async fn example() -> dealcast::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! let (_stop, stop_rx) = tokio::sync::watch::channel(false);
//! bootstrap::run(config, stop_rx).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
