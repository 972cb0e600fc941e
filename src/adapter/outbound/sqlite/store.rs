//! SQLite deal store implementation.
//!
//! Keeps one row per announced (product, sale price) pair. Duplicate checks
//! are exact matches on that key; statistics are aggregated over all rows
//! for a product.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::database::connection::DbPool;
use super::database::model::PostedDealRow;
use super::database::schema::posted_deals;
use crate::domain::{Deal, DealStats, ProductId};
use crate::error::{Error, Result};
use crate::port::outbound::store::DealStore;

/// SQLite-backed deal store.
///
/// Implements the [`DealStore`] trait for persistent posting history.
pub struct SqliteDealStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteDealStore {
    /// Create a new SQLite deal store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn to_row(deal: &Deal) -> PostedDealRow {
        PostedDealRow {
            product_id: deal.id().to_string(),
            sale_price: price_key(deal.sale_price()),
            title: deal.title().to_string(),
            original_price: price_key(deal.original_price()),
            discount_percent: i32::from(deal.discount_percent()),
            category: deal.category().to_string(),
            source_url: deal.source_url().to_string(),
            posted_at: timestamp(Utc::now()),
        }
    }
}

/// Canonical text form of a price: `19.90` and `19.9` share a key.
fn price_key(price: Decimal) -> String {
    price.normalize().to_string()
}

fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl DealStore for SqliteDealStore {
    async fn prune(&self, retention_days: u32) -> Result<usize> {
        // A window reaching past the earliest representable date keeps everything.
        let Some(cutoff) = Duration::try_days(i64::from(retention_days))
            .and_then(|window| Utc::now().checked_sub_signed(window))
        else {
            return Ok(0);
        };
        let cutoff = timestamp(cutoff);
        let mut conn = self.conn()?;

        let expired = posted_deals::table.filter(posted_deals::posted_at.lt(&cutoff));
        let deleted = diesel::delete(expired)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deleted)
    }

    async fn is_duplicate(&self, id: &ProductId, sale_price: Decimal) -> Result<bool> {
        let mut conn = self.conn()?;

        diesel::select(diesel::dsl::exists(
            posted_deals::table
                .filter(posted_deals::product_id.eq(id.as_str()))
                .filter(posted_deals::sale_price.eq(price_key(sale_price))),
        ))
        .get_result(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn stats(&self, id: &ProductId) -> Result<Option<DealStats>> {
        let mut conn = self.conn()?;

        let prices: Vec<String> = posted_deals::table
            .filter(posted_deals::product_id.eq(id.as_str()))
            .select(posted_deals::sale_price)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut lowest: Option<Decimal> = None;
        for raw in &prices {
            let price = Decimal::from_str(raw)
                .map_err(|e| Error::Database(format!("corrupt price '{raw}': {e}")))?;
            lowest = Some(lowest.map_or(price, |low| low.min(price)));
        }

        Ok(lowest.map(|lowest_price_seen| DealStats {
            id: id.clone(),
            lowest_price_seen,
            times_posted: u32::try_from(prices.len()).unwrap_or(u32::MAX),
        }))
    }

    async fn upsert(&self, deal: &Deal) -> Result<()> {
        let row = Self::to_row(deal);
        let mut conn = self.conn()?;

        diesel::replace_into(posted_deals::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}
