//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed deal history store using Diesel ORM.

pub mod database;
pub mod store;

pub use store::SqliteDealStore;
