//! Publisher port for delivering rendered messages.

use async_trait::async_trait;
use thiserror::Error;

/// Failure to deliver a message to the channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The platform refused the message (bad channel, bad credentials,
    /// malformed payload).
    #[error("message rejected: {0}")]
    Rejected(String),

    /// The message could not reach the platform.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Delivers text messages to a channel.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Send `text` to `channel` with link previews enabled.
    async fn send(&self, channel: &str, text: &str) -> Result<(), PublishError>;
}
