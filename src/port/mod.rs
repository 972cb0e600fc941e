//! Capability interfaces the orchestrator depends on.
//!
//! Each collaborator is specified only by its trait here. Production
//! implementations live under `adapter::outbound`; deterministic doubles
//! live in `testkit`.

pub mod outbound;

pub use outbound::discovery::DealDiscovery;
pub use outbound::proxy::{ProxyHandle, ProxySource};
pub use outbound::publisher::{PublishError, Publisher};
pub use outbound::store::DealStore;
