//! Dry-run publisher.

use async_trait::async_trait;
use tracing::info;

use crate::port::outbound::publisher::{PublishError, Publisher};

/// A publisher that logs messages via tracing instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn send(&self, channel: &str, text: &str) -> Result<(), PublishError> {
        info!(channel, message = %text, "Dry-run: would publish deal");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_publisher_always_succeeds() {
        assert_eq!(LogPublisher.send("@deals", "hello").await, Ok(()));
    }
}
