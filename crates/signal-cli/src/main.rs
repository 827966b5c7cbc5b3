//! signal-gatt - BlueZ GATT peripheral entry point

use clap::Parser;
use tracing::{error, info};

use signal_cli::{cli::Cli, config::AppConfig, error::Result};
use signal_gatt::{GattError, GattServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    setup_logging(cli.verbose);

    // Load configuration
    let config = load_configuration(&cli)?;

    // Build the fixed object tree
    let server = GattServer::new(config.gatt)?;

    // Serve until interrupted. A missing adapter is fatal before the
    // registration handshake is even attempted; a failed handshake is not.
    if let Err(e) = server.run().await {
        match e {
            GattError::AdapterUnavailable => {
                error!("{}", e);
                error!("Make sure bluetoothd is running and an adapter is present");
            }
            other => error!("GATT server failed: {}", other),
        }
        std::process::exit(1);
    }

    info!("signal-gatt exited successfully");
    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or use defaults, then apply CLI overrides
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        info!("Loading configuration from: {}", config_path);
        AppConfig::load_from_file(config_path)?
    } else {
        info!("Using default configuration");
        AppConfig::default()
    };

    if let Some(adapter) = &cli.adapter {
        config.gatt.adapter = Some(adapter.clone());
    }
    if let Some(payload_file) = &cli.payload_file {
        info!("Loading payload from: {}", payload_file);
        config.gatt.payload = std::fs::read_to_string(payload_file)?;
    }

    Ok(config)
}
