//! League Tracker
//!
//! Loads configuration, wires the statistics, roster, weekly and projection
//! components together and runs one command.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use league_tracker_service::{initialize_logging, load_configuration, Cli, CliHandler, TrackerService};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = load_configuration(cli.config.as_deref())?;

    // Initialize logging before any component logs
    initialize_logging(&config.logging)?;
    info!("Starting League Tracker v{}", env!("CARGO_PKG_VERSION"));

    let service = TrackerService::new(config).context("Failed to initialize tracker")?;
    let handler = CliHandler::new(service);

    match handler.handle_command(cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
