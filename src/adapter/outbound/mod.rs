//! Outbound adapters (driven side).

pub mod amazon;
pub mod log;
pub mod proxy;
pub mod sqlite;
pub mod telegram;
