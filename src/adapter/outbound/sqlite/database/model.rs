//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::posted_deals;

/// Database row for one announced (product, price) pair.
///
/// Prices are stored as normalized decimal strings so equality is exact.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = posted_deals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PostedDealRow {
    pub product_id: String,
    pub sale_price: String,
    pub title: String,
    pub original_price: String,
    pub discount_percent: i32,
    pub category: String,
    pub source_url: String,
    pub posted_at: String,
}
