//! Persistence port for posted deals.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Deal, DealStats, ProductId};
use crate::error::Result;

/// Storage operations for deal posting history.
#[async_trait]
pub trait DealStore: Send + Sync {
    /// Delete records older than `retention_days`. Returns count deleted.
    async fn prune(&self, retention_days: u32) -> Result<usize>;

    /// Whether `id` was already posted at exactly `sale_price`.
    async fn is_duplicate(&self, id: &ProductId, sale_price: Decimal) -> Result<bool>;

    /// Posting history for `id`, or `None` if it was never posted.
    async fn stats(&self, id: &ProductId) -> Result<Option<DealStats>>;

    /// Record a posted deal. Repeating the same input has no further effect.
    async fn upsert(&self, deal: &Deal) -> Result<()>;
}
