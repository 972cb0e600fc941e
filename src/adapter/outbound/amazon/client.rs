//! HTTP client for the deal feed.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::dto::{FeedDeal, FeedResponse};
use crate::domain::Deal;
use crate::error::{Error, Result};
use crate::infrastructure::config::Config;
use crate::port::outbound::discovery::DealDiscovery;
use crate::port::outbound::proxy::ProxyHandle;

/// Production [`DealDiscovery`] that polls the configured JSON feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DealFeedClient;

impl DealFeedClient {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DealDiscovery for DealFeedClient {
    async fn discover(&self, handle: &ProxyHandle, config: &Config) -> Result<Vec<Deal>> {
        let url = &config.scraping.deals_url;
        debug!(url = %url, proxy = ?handle, "Fetching deal feed");

        let response = handle
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Discovery(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Discovery(format!("feed returned error status: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::Discovery(format!("failed to read feed body: {e}")))?;

        let deals = parse_feed(&body, config.scraping.min_discount)?;
        info!(deals = deals.len(), "Deal feed fetched");
        Ok(deals)
    }
}

/// Parse a feed body into deals, keeping feed order.
///
/// Records that are malformed or violate deal invariants are dropped, as are
/// deals advertising less than `min_discount` percent.
///
/// # Errors
/// Returns [`Error::Discovery`] if the body is not a JSON deal list.
pub fn parse_feed(body: &str, min_discount: u8) -> Result<Vec<Deal>> {
    let response: FeedResponse = serde_json::from_str(body)
        .map_err(|e| Error::Discovery(format!("unparseable feed: {e}")))?;

    let deals = response
        .into_records()
        .into_iter()
        .filter_map(|record| {
            let record: FeedDeal = match serde_json::from_value(record) {
                Ok(record) => record,
                Err(e) => {
                    debug!(error = %e, "Skipping malformed feed record");
                    return None;
                }
            };
            into_deal(record)
        })
        .filter(|deal| deal.discount_percent() >= min_discount)
        .collect();

    Ok(deals)
}

fn into_deal(record: FeedDeal) -> Option<Deal> {
    let discount = record
        .discount
        .unwrap_or_else(|| derived_discount(record.sale_price, record.original_price));

    match Deal::try_new(
        record.asin.trim(),
        record.title.trim(),
        record.sale_price,
        record.original_price,
        discount,
        record.category.trim(),
        record.url.trim(),
    ) {
        Ok(deal) => Some(deal),
        Err(e) => {
            debug!(asin = %record.asin, error = %e, "Skipping invalid deal");
            None
        }
    }
}

/// Whole-percent discount implied by the two prices.
fn derived_discount(sale: Decimal, original: Decimal) -> u32 {
    if original <= Decimal::ZERO || sale > original {
        return 0;
    }
    ((original - sale) / original * Decimal::ONE_HUNDRED)
        .round()
        .to_u32()
        .unwrap_or(0)
}
