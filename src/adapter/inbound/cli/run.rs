//! Handler for the `run` command.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Run the posting loop until Ctrl-C.
///
/// # Errors
/// Returns an error if wiring or initialization fails.
pub async fn execute(config: Config) -> Result<()> {
    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
        }
        let _ = stop_tx.send(true);
    });

    bootstrap::run(config, stop_rx).await
}
