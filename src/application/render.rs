//! Deal announcement rendering.
//!
//! Turns a [`Deal`] plus its optional posting history into the plain-text
//! message published to the channel. Rendering is pure: the render time is
//! passed in by the caller.

use chrono::{DateTime, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{Deal, DealStats};
use crate::infrastructure::config::AffiliateConfig;

/// Fixed promotional hashtags appended after the category tag.
const PROMO_TAGS: &str = "#AmazonDeals #Discount";

/// Timestamp layout for the `Posted:` footer.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders deal announcements and affiliate links.
#[derive(Debug, Clone)]
pub struct MessageRenderer {
    affiliate_tag: String,
    currency_symbol: String,
}

impl MessageRenderer {
    pub fn new(affiliate_tag: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
        Self {
            affiliate_tag: affiliate_tag.into(),
            currency_symbol: currency_symbol.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AffiliateConfig) -> Self {
        Self::new(&config.affiliate_id, &config.currency_symbol)
    }

    /// Append the affiliate tag to `url` as the `tag` query parameter.
    ///
    /// Joins with `&` when the URL already has a `?`, otherwise starts a query
    /// string. The URL is not otherwise validated or normalized.
    ///
    /// ```
    /// use dealcast::application::render::MessageRenderer;
    ///
    /// let renderer = MessageRenderer::new("abc", "$");
    /// assert_eq!(renderer.affiliate_link("https://x/y"), "https://x/y?tag=abc");
    /// assert_eq!(renderer.affiliate_link("https://x/y?z=1"), "https://x/y?z=1&tag=abc");
    /// ```
    #[must_use]
    pub fn affiliate_link(&self, url: &str) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{url}{separator}tag={}", self.affiliate_tag)
    }

    /// Render the announcement for `deal`.
    ///
    /// The history block is included only when `stats` is present and the
    /// product has been posted more than once.
    pub fn render<Tz>(
        &self,
        deal: &Deal,
        stats: Option<&DealStats>,
        rendered_at: &DateTime<Tz>,
    ) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let history = match stats {
            Some(stats) if stats.times_posted > 1 => format!(
                "\n💹 Lowest Price: {}\n📊 Times Listed: {}",
                self.money(stats.lowest_price_seen),
                stats.times_posted
            ),
            _ => String::new(),
        };

        format!(
            "🔥 HOT DEAL ALERT! 🔥\n\
            \n\
            📦 {title}\n\
            \n\
            💰 Sale Price: {sale}\n\
            ❌ Original: {original}\n\
            💯 Save: {percent}% ({savings}){history}\n\
            \n\
            🛍️ Buy Now: {link}\n\
            \n\
            #{category} {PROMO_TAGS}\n\
            Posted: {posted}",
            title = deal.title(),
            sale = self.money(deal.sale_price()),
            original = self.money(deal.original_price()),
            percent = deal.discount_percent(),
            savings = self.money(deal.savings()),
            link = self.affiliate_link(deal.source_url()),
            category = capitalize(deal.category()),
            posted = rendered_at.format(TIMESTAMP_FORMAT),
        )
    }

    /// Two decimals, ties to even (`7.125` renders as `7.12`).
    fn money(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        format!("{}{:.2}", self.currency_symbol, rounded)
    }
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
