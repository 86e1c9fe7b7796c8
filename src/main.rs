//! PromptGrab - local prompt library
//!
#![doc = "Main entry point for the promptgrab command."]

use anyhow::Result;

use promptgrab::cli::Cli;
use promptgrab::commands;
use promptgrab::config::Config;
use promptgrab::logging::{bootstrap_subscriber, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration; override warnings go to a default-level subscriber
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        Config::load(config_path, &cli)
    })?;

    // Initialize logging from the loaded configuration
    init_logging(&config.logging)?;

    // Validate configuration
    config.validate()?;

    tracing::debug!(backend = ?config.storage.backend, "Configuration loaded");
    commands::run(&config, cli.command).await
}
