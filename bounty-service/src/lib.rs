//! Bounty Service Library
//!
//! This crate provides a thin REST API over the AgentBounty client library:
//! read-only JSON projections of protocol and bounty state, plus endpoints
//! that return unsigned instructions for wallet-side signing. The service
//! never holds private keys and never submits transactions.

pub mod api;
pub mod config;

// Re-export commonly used types
pub use api::ApiServer;
pub use config::{ApiConfig, ChainConfig, Config};
