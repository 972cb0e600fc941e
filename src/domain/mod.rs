//! Source-agnostic deal types.

pub mod deal;
pub mod error;

pub use deal::{Deal, DealStats, ProductId};
