//! Deal and price-history types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Stable catalog key for a product (an ASIN for Amazon listings).
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new `ProductId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the product ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A discounted product discovered during one cycle.
///
/// Invariant: `original_price >= sale_price >= 0` and
/// `discount_percent <= 100`. The discount percent is whatever the source
/// advertised; it is not required to match the price difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    id: ProductId,
    title: String,
    sale_price: Decimal,
    original_price: Decimal,
    discount_percent: u8,
    category: String,
    source_url: String,
}

impl Deal {
    /// Create a deal, validating the price and discount invariants.
    ///
    /// # Errors
    /// Returns a [`DomainError`] if any invariant is violated.
    pub fn try_new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        sale_price: Decimal,
        original_price: Decimal,
        discount_percent: u32,
        category: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(DomainError::EmptyProductId);
        }
        if sale_price < Decimal::ZERO {
            return Err(DomainError::NegativePrice { price: sale_price });
        }
        if sale_price > original_price {
            return Err(DomainError::SaleAboveOriginal {
                sale: sale_price,
                original: original_price,
            });
        }
        let discount_percent = u8::try_from(discount_percent)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(DomainError::DiscountOutOfRange {
                percent: discount_percent,
            })?;

        Ok(Self {
            id,
            title: title.into(),
            sale_price,
            original_price,
            discount_percent,
            category: category.into(),
            source_url: source_url.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn sale_price(&self) -> Decimal {
        self.sale_price
    }

    #[must_use]
    pub fn original_price(&self) -> Decimal {
        self.original_price
    }

    /// Advertised discount, 0..=100.
    #[must_use]
    pub fn discount_percent(&self) -> u8 {
        self.discount_percent
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Amount saved against the original price.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        self.original_price - self.sale_price
    }
}

/// Posting history for a product, derived by the deal store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealStats {
    pub id: ProductId,
    pub lowest_price_seen: Decimal,
    pub times_posted: u32,
}
