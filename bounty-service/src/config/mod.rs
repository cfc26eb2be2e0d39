//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the bounty
//! service. Configuration includes the Solana RPC endpoint, the bounty
//! program id, and API server settings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all service settings.
///
/// This structure holds configuration for:
/// - Solana chain connection details (RPC endpoint, program id)
/// - API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chain connection configuration
    pub chain: ChainConfig,
    /// API server configuration (host, port, CORS settings)
    pub api: ApiConfig,
}

/// Configuration for the Solana chain connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Human-readable name for the chain (e.g. "devnet")
    pub name: String,
    /// RPC endpoint URL for blockchain communication
    pub rpc_url: String,
    /// Program id of the bounty program (base58)
    pub program_id: String,
}

/// API server configuration for external communication.
///
/// Controls how the bounty service exposes its REST API endpoints
/// and handles cross-origin requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host address to bind the API server to
    pub host: String,
    /// Port number to bind the API server to
    pub port: u16,
    /// Allowed CORS origins for cross-origin requests
    pub cors_origins: Vec<String>,
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Validates the configuration.
    ///
    /// This function ensures that:
    /// - The program id parses as a base58 public key
    /// - The RPC URL is non-empty
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - Invalid program id or RPC URL
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chain.rpc_url.is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration error: chain.rpc_url must not be empty"
            ));
        }
        Pubkey::from_str(&self.chain.program_id).map_err(|_| {
            anyhow::anyhow!(
                "Configuration error: chain.program_id `{}` is not a valid base58 public key",
                self.chain.program_id
            )
        })?;
        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// This function:
    /// 1. Checks if config/bounty_service.toml exists (or the path in the
    ///    `BOUNTY_SERVICE_CONFIG_PATH` env var)
    /// 2. If it exists, loads, parses, and validates the configuration
    /// 3. If it doesn't exist, returns an error asking the user to copy the
    ///    template
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - Failed to load or validate configuration
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("BOUNTY_SERVICE_CONFIG_PATH")
            .unwrap_or_else(|_| "config/bounty_service.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/bounty_service.template.toml config/bounty_service.toml\n\
                Then edit config/bounty_service.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Creates a default configuration suitable for local development.
    ///
    /// The program id is a placeholder and must be replaced with the deployed
    /// program's id for anything beyond tests.
    pub fn default() -> Self {
        Self {
            chain: ChainConfig {
                name: "localnet".to_string(),
                rpc_url: "http://127.0.0.1:8899".to_string(),
                program_id: "9XsneLeHEpV7xFfqoTjFUeDS1tbq74PuXytSxsBy8BK".to_string(),
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
        }
    }
}
