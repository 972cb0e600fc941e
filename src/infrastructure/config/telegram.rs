//! Telegram channel configuration.

use serde::Deserialize;

/// Telegram credentials and destination channel.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    ///
    /// May be left out of the file when `TELEGRAM_BOT_TOKEN` is set.
    #[serde(default)]
    pub bot_token: String,
    /// Destination channel: a numeric chat id or an `@username`.
    pub channel_id: String,
}
