//! Deal feed data transfer objects.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level feed body: a bare array or an object wrapping one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FeedResponse {
    List(Vec<serde_json::Value>),
    Wrapped { deals: Vec<serde_json::Value> },
}

impl FeedResponse {
    #[must_use]
    pub fn into_records(self) -> Vec<serde_json::Value> {
        match self {
            Self::List(records) | Self::Wrapped { deals: records } => records,
        }
    }
}

/// One deal record as published by the feed.
///
/// Prices may be JSON numbers or strings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedDeal {
    pub asin: String,
    pub title: String,
    pub sale_price: Decimal,
    pub original_price: Decimal,
    /// Advertised discount; derived from the prices when absent.
    #[serde(default)]
    pub discount: Option<u32>,
    #[serde(default)]
    pub category: String,
    pub url: String,
}
