//! Builders for deals used across tests.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::Deal;

/// A valid deal for product `id` at `sale`, listed at $100.00.
///
/// # Panics
/// Panics if `sale` is negative or above $100.00.
pub fn deal(id: &str, sale: Decimal) -> Deal {
    deal_with(id, "Wireless Earbuds", sale, dec!(100.00), "electronics")
}

/// A valid deal with every descriptive field chosen by the caller.
/// The discount is derived from the two prices.
///
/// # Panics
/// Panics if the prices violate the deal invariant.
pub fn deal_with(id: &str, title: &str, sale: Decimal, original: Decimal, category: &str) -> Deal {
    let discount = if original.is_zero() {
        0
    } else {
        ((original - sale) / original * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
            .unwrap_or(0)
    };
    Deal::try_new(
        id,
        title,
        sale,
        original,
        discount,
        category,
        format!("https://www.amazon.com/dp/{id}"),
    )
    .expect("test deal must be valid")
}

/// `n` distinct deals `P0`, `P1`, ... all at $50.00.
pub fn batch(n: usize) -> Vec<Deal> {
    (0..n).map(|i| deal(&format!("P{i}"), dec!(50.00))).collect()
}
