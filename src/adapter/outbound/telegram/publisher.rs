//! Telegram channel publisher.
//!
//! Sends rendered deal messages through the Bot API. Messages go out as
//! plain text with the link preview left enabled, so the outbound link's
//! preview card is shown under each announcement.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use teloxide::RequestError;
use tracing::debug;

use crate::port::outbound::publisher::{PublishError, Publisher};

/// Production [`Publisher`] backed by a Telegram bot.
pub struct TelegramPublisher {
    bot: Bot,
}

impl TelegramPublisher {
    /// Create a publisher for the bot identified by `bot_token`.
    #[must_use]
    pub fn new(bot_token: &str) -> Self {
        Self {
            bot: Bot::new(bot_token),
        }
    }
}

/// Map a configured channel id to a Bot API recipient.
///
/// Numeric ids (including negative supergroup/channel ids) are chat ids;
/// anything else is treated as a public `@username`.
#[must_use]
pub fn parse_recipient(channel: &str) -> Recipient {
    let channel = channel.trim();
    match channel.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if channel.starts_with('@') => Recipient::ChannelUsername(channel.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{channel}")),
    }
}

fn classify(error: RequestError) -> PublishError {
    match error {
        RequestError::Api(api) => PublishError::Rejected(api.to_string()),
        other => PublishError::Transport(other.to_string()),
    }
}

#[async_trait]
impl Publisher for TelegramPublisher {
    async fn send(&self, channel: &str, text: &str) -> Result<(), PublishError> {
        let message = self
            .bot
            .send_message(parse_recipient(channel), text)
            .await
            .map_err(classify)?;
        debug!(message_id = message.id.0, "Telegram message sent");
        Ok(())
    }
}
