//! Domain validation errors for deal types.
//!
//! These errors are returned by `try_new` constructors when an incoming
//! record violates a deal invariant.
//!
//! # Examples
//!
//! ```
//! use dealcast::domain::error::DomainError;
//! use dealcast::domain::Deal;
//! use rust_decimal_macros::dec;
//!
//! let result = Deal::try_new(
//!     "B000TEST01",
//!     "Widget",
//!     dec!(30.00), // sale above original
//!     dec!(20.00),
//!     10,
//!     "tools",
//!     "https://example.com/dp/B000TEST01",
//! );
//!
//! assert!(matches!(result, Err(DomainError::SaleAboveOriginal { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when deal invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Product identifiers must not be blank.
    #[error("product id cannot be empty")]
    EmptyProductId,

    /// Prices cannot be negative.
    #[error("sale price must be non-negative, got {price}")]
    NegativePrice {
        /// The invalid sale price.
        price: Decimal,
    },

    /// A discount cannot cost more than the list price.
    #[error("sale price {sale} exceeds original price {original}")]
    SaleAboveOriginal {
        /// The sale price.
        sale: Decimal,
        /// The original price.
        original: Decimal,
    },

    /// Discount percentages are bounded to 0..=100.
    #[error("discount percent must be within 0..=100, got {percent}")]
    DiscountOutOfRange {
        /// The invalid percentage.
        percent: u32,
    },
}
