use clap::Parser;
use dealcast::adapter::inbound::cli::command::{Cli, Commands};
use dealcast::adapter::inbound::cli::{check, run};
use dealcast::infrastructure::config::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };

    match cli.command() {
        Commands::Check => check::execute(&cli.config, &config),
        Commands::Run => {
            config.init_logging();
            info!("dealcast starting");

            if let Err(e) = run::execute(config).await {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }

            info!("dealcast stopped");
        }
    }
}
