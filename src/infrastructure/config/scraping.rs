//! Discovery, egress and pacing configuration.

use std::time::Duration;

use serde::Deserialize;

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_error_cooldown_secs() -> u64 {
    60
}

/// Pause bounds between consecutive requests, in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestDelayConfig {
    /// Minimum pause; applied after every successful post.
    pub min: f64,
    /// Upper bound; defaults to `min`. Only validated: posts are always
    /// throttled by `min`. Kept so existing config files still load.
    #[serde(default)]
    pub max: Option<f64>,
}

impl RequestDelayConfig {
    /// Minimum pause as a duration. Values rejected by validation map to
    /// no pause.
    #[must_use]
    pub fn min_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.min).unwrap_or_default()
    }

    /// Effective upper bound.
    #[must_use]
    pub fn max_secs(&self) -> f64 {
        self.max.unwrap_or(self.min)
    }
}

/// Deal discovery and cycle pacing.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingConfig {
    /// Upper bound on the number of proxies kept in rotation.
    pub max_proxies: usize,
    /// Pause between consecutive posts.
    pub request_delay: RequestDelayConfig,
    /// Minutes to wait between discovery cycles.
    pub update_interval_minutes: u64,
    /// JSON deal feed polled each cycle.
    pub deals_url: String,
    /// Proxy endpoints (`http://` or `https://`). Empty means
    /// direct egress.
    #[serde(default)]
    pub proxies: Vec<String>,
    /// Deals advertising a smaller discount are ignored.
    #[serde(default)]
    pub min_discount: u8,
    /// Per-request HTTP timeout (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Fixed wait after a failed cycle (default: 60).
    #[serde(default = "default_error_cooldown_secs")]
    pub error_cooldown_secs: u64,
}

impl ScrapingConfig {
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_minutes.saturating_mul(60))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.error_cooldown_secs)
    }
}
