//! Outbound egress adapters.

mod pool;

pub use pool::ProxyPool;
