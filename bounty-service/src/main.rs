//! Bounty Service
//!
//! A REST API service for the AgentBounty escrow protocol. The service reads
//! protocol and bounty state from the ledger and builds unsigned
//! instructions for client-side signing.
//!
//! ## Security Model
//!
//! The service has NO private keys and CANNOT move funds. Every write
//! endpoint returns an instruction description that a wallet must sign and
//! submit itself.

use anyhow::Result;
use tracing::info;

mod api;
mod config;

use bounty_client::BountyClient;
use config::Config;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

/// Main application entry point that initializes and runs the bounty service.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration from TOML file
/// 3. Creates the bounty client
/// 4. Starts the API server and runs until shutdown
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging for debugging and monitoring
    tracing_subscriber::fmt::init();

    info!("Starting Bounty Service");

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("Bounty Service");
        println!();
        println!("Usage: bounty-service [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>   Use custom config file path");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  BOUNTY_SERVICE_CONFIG_PATH    Path to config file (overrides --config)");
        return Ok(());
    }

    // Check for custom config path
    let mut config_path = None;
    for (i, arg) in args.iter().enumerate() {
        if arg == "--config" && i + 1 < args.len() {
            config_path = Some(args[i + 1].clone());
            break;
        }
    }

    if let Some(path) = config_path {
        std::env::set_var("BOUNTY_SERVICE_CONFIG_PATH", &path);
        info!("Using custom config: {}", path);
    }

    // Load configuration from config file (or BOUNTY_SERVICE_CONFIG_PATH env var)
    let config = Config::load()?;
    info!(
        "Configuration loaded: chain `{}`, program {}",
        config.chain.name, config.chain.program_id
    );

    // Create the bounty client used by all handlers
    let client = BountyClient::new(&config.chain.rpc_url, &config.chain.program_id)?;

    // Run the API server (this blocks until shutdown)
    let api_server = api::ApiServer::new(config, client);
    api_server.run().await?;

    Ok(())
}
