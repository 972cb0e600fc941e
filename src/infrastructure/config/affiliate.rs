//! Affiliate program configuration.

use serde::Deserialize;

fn default_currency_symbol() -> String {
    "$".to_string()
}

/// Affiliate tag appended to outbound links, and display currency.
#[derive(Debug, Clone, Deserialize)]
pub struct AffiliateConfig {
    /// Associate tag, added to links as `tag=<affiliate_id>`.
    pub affiliate_id: String,
    /// Symbol printed before prices (default: `$`).
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl AffiliateConfig {
    /// True when the tag can be embedded in a query string without encoding.
    #[must_use]
    pub fn is_query_safe(&self) -> bool {
        !self.affiliate_id.is_empty()
            && self
                .affiliate_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}
