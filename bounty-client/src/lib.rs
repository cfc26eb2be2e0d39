//! AgentBounty Client Library
//!
//! Client-side orchestration for the AgentBounty escrow protocol on Solana:
//! account codecs, deterministic address derivation, the bounty lifecycle
//! state machine, instruction builders, and an RPC client facade.
//!
//! The library never holds private keys. Every builder returns an unsigned
//! instruction for the caller to sign and submit; all shared state lives on
//! the ledger and concurrent submissions are arbitrated by its account
//! write-locks, not by anything in this crate.

pub mod client;
pub mod codec;
pub mod error;
pub mod instruction;
pub mod lifecycle;
pub mod pda;
pub mod state;

// Re-export the types most callers need
pub use client::{BountyClient, BountyFilter, BountyWithAddress, PreparedCreate, ProtocolStats};
pub use error::ClientError;
pub use state::{Bounty, BountyStatus, Protocol};
