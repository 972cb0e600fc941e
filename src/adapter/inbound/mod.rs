//! Inbound adapters (driving side): entry points that start the application.

pub mod cli;
