//! Canonical test configuration.
//!
//! Single source of truth for the config used across tests: an in-memory
//! database, a 2 second throttle, a 30 minute cycle interval and the default
//! 60 second error cooldown.

use crate::infrastructure::config::Config;

/// Test bot token; never reaches a real API.
pub const BOT_TOKEN: &str = "123456:TEST-TOKEN";

/// Test destination channel.
pub const CHANNEL: &str = "@test_deals";

/// TOML for the canonical test configuration.
pub const SAMPLE_TOML: &str = r#"
[telegram]
bot_token = "123456:TEST-TOKEN"
channel_id = "@test_deals"

[database]
path = ":memory:"
retention_days = 30

[scraping]
max_proxies = 2
deals_url = "https://deals.example.com/feed.json"
update_interval_minutes = 30

[scraping.request_delay]
min = 2

[amazon]
affiliate_id = "testtag-20"
"#;

/// The canonical test configuration, ignoring the environment token.
///
/// # Panics
/// Panics if [`SAMPLE_TOML`] stops validating.
pub fn config() -> Config {
    Config::parse_toml_with_token(SAMPLE_TOML, None).expect("sample config must validate")
}
