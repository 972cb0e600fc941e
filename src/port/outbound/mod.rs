//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the external subsystems the posting pipeline
//! relies on: egress, discovery, storage, and message delivery.

pub mod discovery;
pub mod proxy;
pub mod publisher;
pub mod store;
