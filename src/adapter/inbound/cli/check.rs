//! Handler for the `check` command.

use std::path::Path;

use crate::infrastructure::config::Config;

/// Print a summary of a validated configuration.
pub fn execute(config_path: &Path, config: &Config) {
    println!("Configuration OK: {}", config_path.display());
    println!("  Channel:         {}", config.telegram.channel_id);
    println!("  Database:        {}", config.database.path);
    println!("  Retention:       {} days", config.database.retention_days);
    println!(
        "  Interval:        {} minutes",
        config.scraping.update_interval_minutes
    );
    println!("  Proxies:         {}", proxy_summary(config));
    println!("  Feed:            {}", config.scraping.deals_url);
    println!("  Dry run:         {}", config.dry_run);
}

fn proxy_summary(config: &Config) -> String {
    let configured = config.scraping.proxies.len();
    if configured == 0 {
        "none (direct)".to_string()
    } else {
        let used = configured.min(config.scraping.max_proxies);
        format!("{used} of {configured}")
    }
}
