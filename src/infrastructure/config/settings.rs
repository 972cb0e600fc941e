//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded once from a TOML file and is immutable afterwards.
//! The bot token may come from the `TELEGRAM_BOT_TOKEN` environment variable
//! instead of the file.
//!
//! # Example
//!
//! ```no_run
//! use dealcast::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::affiliate::AffiliateConfig;
use super::database::DatabaseConfig;
use super::logging::LoggingConfig;
use super::scraping::ScrapingConfig;
use super::telegram::TelegramConfig;
use crate::error::{ConfigError, Result};

/// Environment variable that overrides `telegram.bot_token`.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Telegram credentials and destination channel.
    pub telegram: TelegramConfig,

    /// Posted-deal history location and retention.
    pub database: DatabaseConfig,

    /// Discovery source, egress and pacing.
    pub scraping: ScrapingConfig,

    /// Affiliate tag and display currency.
    #[serde(rename = "amazon")]
    pub affiliate: AffiliateConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Enable dry-run mode.
    ///
    /// When true, rendered messages are written to the log instead of the
    /// channel. Defaults to false.
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Reads the bot token override from `TELEGRAM_BOT_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, a required key is missing,
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_token(content, std::env::var(BOT_TOKEN_ENV).ok())
    }

    /// Parse configuration from TOML content with an explicit token override.
    ///
    /// # Errors
    ///
    /// Same as [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_token(content: &str, token: Option<String>) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            config.telegram.bot_token = token;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "telegram.bot_token",
            }
            .into());
        }
        if self.telegram.channel_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "telegram.channel_id",
            }
            .into());
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.path",
            }
            .into());
        }
        if self.affiliate.affiliate_id.is_empty() {
            return Err(ConfigError::MissingField {
                field: "amazon.affiliate_id",
            }
            .into());
        }
        if !self.affiliate.is_query_safe() {
            return Err(ConfigError::InvalidValue {
                field: "amazon.affiliate_id",
                reason: "may only contain letters, digits, '-', '_' and '.'".to_string(),
            }
            .into());
        }

        let delay = &self.scraping.request_delay;
        if delay.min < 0.0 || Duration::try_from_secs_f64(delay.min).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "scraping.request_delay.min",
                reason: "must be a representable number of seconds >= 0".to_string(),
            }
            .into());
        }
        if !delay.max_secs().is_finite() || delay.max_secs() < delay.min {
            return Err(ConfigError::InvalidValue {
                field: "scraping.request_delay.max",
                reason: "must be >= request_delay.min".to_string(),
            }
            .into());
        }

        if self.scraping.deals_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "scraping.deals_url",
            }
            .into());
        }
        Url::parse(&self.scraping.deals_url).map_err(|e| ConfigError::InvalidValue {
            field: "scraping.deals_url",
            reason: e.to_string(),
        })?;

        for proxy in &self.scraping.proxies {
            Url::parse(proxy).map_err(|e| ConfigError::InvalidValue {
                field: "scraping.proxies",
                reason: format!("{proxy}: {e}"),
            })?;
        }
        if !self.scraping.proxies.is_empty() && self.scraping.max_proxies == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.max_proxies",
                reason: "must be greater than 0 when proxies are configured".to_string(),
            }
            .into());
        }
        if self.scraping.min_discount > 100 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.min_discount",
                reason: "must be between 0 and 100".to_string(),
            }
            .into());
        }
        if self.scraping.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.request_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const BASE: &str = r#"
[telegram]
bot_token = "123:abc"
channel_id = "@deals"

[database]
path = "deals.db"
retention_days = 30

[scraping]
max_proxies = 5
update_interval_minutes = 15
deals_url = "https://feed.example.com/deals.json"

[scraping.request_delay]
min = 2

[amazon]
affiliate_id = "dealcast-20"
"#;

    fn parse(content: &str) -> Result<Config> {
        Config::parse_toml_with_token(content, None)
    }

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = parse(BASE).unwrap();

        assert_eq!(config.telegram.channel_id, "@deals");
        assert_eq!(config.database.retention_days, 30);
        assert_eq!(config.scraping.update_interval(), Duration::from_secs(900));
        assert_eq!(
            config.scraping.request_delay.min_duration(),
            Duration::from_secs(2)
        );
        assert_eq!(config.scraping.error_cooldown(), Duration::from_secs(60));
        assert!(config.scraping.proxies.is_empty());
        assert_eq!(config.affiliate.currency_symbol, "$");
        assert_eq!(config.logging.level, "info");
        assert!(!config.dry_run);
    }

    #[test]
    fn fractional_request_delay() {
        let content = BASE.replace("min = 2", "min = 1.5");
        let config = parse(&content).unwrap();
        assert_eq!(
            config.scraping.request_delay.min_duration(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn token_override_replaces_file_value() {
        let config =
            Config::parse_toml_with_token(BASE, Some("999:override".to_string())).unwrap();
        assert_eq!(config.telegram.bot_token, "999:override");
    }

    #[test]
    fn token_override_fills_missing_token() {
        let content = BASE.replace("bot_token = \"123:abc\"\n", "");
        assert!(matches!(
            parse(&content),
            Err(Error::Config(ConfigError::MissingField {
                field: "telegram.bot_token"
            }))
        ));
        let config = Config::parse_toml_with_token(&content, Some("1:x".to_string())).unwrap();
        assert_eq!(config.telegram.bot_token, "1:x");
    }

    #[test]
    fn missing_section_is_parse_error() {
        let content = BASE.replace("[amazon]\naffiliate_id = \"dealcast-20\"\n", "");
        assert!(matches!(
            parse(&content),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn rejects_unsafe_affiliate_tag() {
        let content = BASE.replace("dealcast-20", "a&b=c");
        assert!(matches!(
            parse(&content),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "amazon.affiliate_id",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_negative_delay() {
        let content = BASE.replace("min = 2", "min = -1");
        assert!(matches!(
            parse(&content),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "scraping.request_delay.min",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_unrepresentable_delay() {
        for min in ["1e20", "nan", "inf"] {
            let content = BASE.replace("min = 2", &format!("min = {min}"));
            assert!(
                matches!(
                    parse(&content),
                    Err(Error::Config(ConfigError::InvalidValue {
                        field: "scraping.request_delay.min",
                        ..
                    }))
                ),
                "min = {min} should be rejected"
            );
        }
    }

    #[test]
    fn partial_logging_table_uses_defaults() {
        let content = format!("{BASE}\n[logging]\nlevel = \"warn\"\n");
        let config = parse(&content).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn rejects_delay_max_below_min() {
        let content = BASE.replace("min = 2", "min = 2\nmax = 1");
        assert!(matches!(
            parse(&content),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "scraping.request_delay.max",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_relative_feed_url() {
        let content = BASE.replace("https://feed.example.com/deals.json", "deals.json");
        assert!(matches!(
            parse(&content),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "scraping.deals_url",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_bad_proxy_url() {
        let content = BASE.replace(
            "max_proxies = 5",
            "max_proxies = 5\nproxies = [\"not a url\"]",
        );
        assert!(matches!(
            parse(&content),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "scraping.proxies",
                ..
            }))
        ));
    }

    #[test]
    fn database_url_formats() {
        let config = parse(BASE).unwrap();
        assert_eq!(config.database.url(), "sqlite://deals.db");

        let content = BASE.replace("path = \"deals.db\"", "path = \":memory:\"");
        let config = parse(&content).unwrap();
        assert_eq!(config.database.url(), ":memory:");
    }
}
