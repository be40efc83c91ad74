use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use lossless_splitter::app::DefaultAppContainer;
use lossless_splitter::cli::{commands, Cli};
use lossless_splitter::config_initialization::initialize_configuration;
use lossless_splitter::utils::logging::init_logging;

/// Main entry point for the splitter CLI
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = initialize_configuration(cli.config.as_deref(), &cli.config_overrides())
        .context("Failed to load configuration")?;
    init_logging(&config.logging()?)?;
    info!("Starting splitter");

    let container = DefaultAppContainer::new(config).context("Failed to initialize")?;
    commands::execute(&container, cli.command).await
}
