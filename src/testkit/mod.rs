//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`doubles`] - Deterministic collaborator doubles: `StaticProxySource`,
//!   `ScriptedDiscovery`, `MemoryDealStore`, `RecordingPublisher`.
//! - [`domain`] - Builders for deals.
//! - [`config`] - Canonical test configuration.

pub mod config;
pub mod doubles;
pub mod domain;

use std::sync::Arc;

use crate::application::Collaborators;

/// Bundle doubles into the orchestrator's collaborator set.
pub fn collaborators(
    proxies: &Arc<doubles::StaticProxySource>,
    discovery: &Arc<doubles::ScriptedDiscovery>,
    store: &Arc<doubles::MemoryDealStore>,
    publisher: &Arc<doubles::RecordingPublisher>,
) -> Collaborators {
    Collaborators {
        proxies: proxies.clone(),
        discovery: discovery.clone(),
        store: store.clone(),
        publisher: publisher.clone(),
    }
}
