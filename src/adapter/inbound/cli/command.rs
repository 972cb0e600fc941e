//! Command-line interface definitions.
//!
//! Defines the CLI structure for the dealcast binary using `clap`. Without a
//! subcommand the binary runs the posting loop.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Discount deal discovery and Telegram posting service
#[derive(Parser, Debug)]
#[command(name = "dealcast")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The selected subcommand, defaulting to `run`.
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Discover deals and post them until interrupted (default)
    Run,

    /// Validate the configuration file and print a summary
    Check,
}
