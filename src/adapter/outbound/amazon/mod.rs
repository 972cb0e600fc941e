//! Amazon deal feed adapter.
//!
//! Implements the `DealDiscovery` port on top of a JSON deal feed fetched
//! through the egress handle supplied by the proxy source.

mod client;
pub mod dto;

pub use client::{parse_feed, DealFeedClient};
