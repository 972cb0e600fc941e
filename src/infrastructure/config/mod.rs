//! Infrastructure configuration modules.

pub mod affiliate;
pub mod database;
pub mod logging;
pub mod scraping;
pub mod settings;
pub mod telegram;

pub use affiliate::AffiliateConfig;
pub use database::DatabaseConfig;
pub use logging::LoggingConfig;
pub use scraping::{RequestDelayConfig, ScrapingConfig};
pub use settings::Config;
pub use telegram::TelegramConfig;
