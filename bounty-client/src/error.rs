//! Error types for the bounty client

use solana_program::pubkey::Pubkey;
use thiserror::Error;

use crate::lifecycle::LifecycleOp;
use crate::state::BountyStatus;

/// Typed failure surface of every public operation in this crate.
///
/// Validation and encoding failures are raised before any network call;
/// ledger rejections carry the program's diagnostic log so callers can
/// decide whether to re-fetch state and retry.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Caller-supplied parameter violates a protocol bound.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Requested operation is not legal from the bounty's current status.
    #[error("operation {operation} is not allowed while bounty status is {status}")]
    InvalidStateTransition {
        operation: LifecycleOp,
        status: BountyStatus,
    },

    /// Claim or submission attempted after the bounty deadline.
    #[error("bounty deadline {deadline} has passed (now {now})")]
    DeadlinePassed { deadline: i64, now: i64 },

    /// The operation requires an on-chain account that does not exist.
    #[error("account {address} not found")]
    AccountNotFound { address: Pubkey },

    /// A value could not be serialized within its declared bound.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// On-chain account data is malformed or undersized.
    #[error("account data malformed: {0}")]
    AccountParse(String),

    /// No valid bump seed was found for a derivation (unreachable in practice).
    #[error("no valid program address for seeds `{seeds}`")]
    DerivationExhausted { seeds: &'static str },

    /// The ledger rejected a submitted transaction.
    #[error("transaction rejected by ledger: {message}")]
    LedgerRejected { message: String, logs: Vec<String> },

    /// Transport-level RPC failure. Reads may be retried with backoff;
    /// submissions must not be blindly retried without re-checking state.
    #[error("rpc transport failure: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
