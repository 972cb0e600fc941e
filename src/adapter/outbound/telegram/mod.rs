//! Telegram delivery adapter.

mod publisher;

pub use publisher::{parse_recipient, TelegramPublisher};
