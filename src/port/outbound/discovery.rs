//! Deal discovery port.

use async_trait::async_trait;

use crate::domain::Deal;
use crate::error::Result;
use crate::infrastructure::config::Config;

use super::proxy::ProxyHandle;

/// Source of candidate deals for one cycle.
#[async_trait]
pub trait DealDiscovery: Send + Sync {
    /// Fetch the current batch of candidate deals through `handle`.
    ///
    /// The batch is finite and may be empty. "No deals found" is an empty
    /// batch, never an error; errors are reserved for transport-level
    /// failures.
    async fn discover(&self, handle: &ProxyHandle, config: &Config) -> Result<Vec<Deal>>;
}
