//! Deal history database configuration.

use serde::Deserialize;

/// Location and retention of the posted-deal history.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub path: String,
    /// Records older than this many days are pruned at startup.
    pub retention_days: u32,
}

impl DatabaseConfig {
    /// Diesel connection URL for the configured path.
    #[must_use]
    pub fn url(&self) -> String {
        if self.path == ":memory:" {
            self.path.clone()
        } else {
            format!("sqlite://{}", self.path)
        }
    }
}
