//! Account state definitions for the bounty protocol

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::codec;
use crate::error::ClientError;

/// Minimum escrowed reward (0.1 SOL).
pub const MIN_REWARD_LAMPORTS: u64 = 100_000_000;
/// Maximum escrowed reward (10 SOL).
pub const MAX_REWARD_LAMPORTS: u64 = 10_000_000_000;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_SUBMISSION_LEN: usize = 500;

/// Fee rate the program sets at initialization (2.5%).
pub const DEFAULT_FEE_BPS: u16 = 250;
pub const FEE_BPS_DENOMINATOR: u64 = 10_000;

/// Seeds for PDA derivation
pub mod seeds {
    pub const PROTOCOL_SEED: &[u8] = b"protocol";
    pub const BOUNTY_SEED: &[u8] = b"bounty";
    pub const ESCROW_SEED: &[u8] = b"escrow";
    pub const FEE_VAULT_SEED: &[u8] = b"fee_vault";
}

/// Singleton protocol state holding the global counters and fee rate
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct Protocol {
    /// Discriminator for account type
    pub discriminator: [u8; 8],
    /// Protocol administrator, set once at initialization
    pub authority: Pubkey,
    /// Source of truth for the next bounty id
    pub total_bounties: u64,
    /// Count of bounties that reached Completed
    pub total_completed: u64,
    /// Cumulative lamports escrowed across all created bounties
    pub total_volume: u64,
    /// Fee rate in basis points, applied on approval payout
    pub fee_bps: u16,
}

impl Protocol {
    pub const DISCRIMINATOR: [u8; 8] = [45, 39, 101, 43, 115, 72, 131, 40];
    pub const LEN: usize = 8 + 32 + 8 + 8 + 8 + 2;

    pub fn new(authority: Pubkey) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            authority,
            total_bounties: 0,
            total_completed: 0,
            total_volume: 0,
            fee_bps: DEFAULT_FEE_BPS,
        }
    }

    pub fn from_account_data(data: &[u8]) -> Result<Self, ClientError> {
        codec::decode_account(&Self::DISCRIMINATOR, data)
    }

    /// Splits a reward into (fee, payout) using integer arithmetic.
    ///
    /// `fee + payout == reward` exactly; truncation stays in the fee share.
    pub fn fee_for(&self, reward: u64) -> (u64, u64) {
        let fee = (reward as u128 * self.fee_bps as u128 / FEE_BPS_DENOMINATOR as u128) as u64;
        (fee, reward - fee)
    }
}

/// Lifecycle status of a bounty. The tag byte on chain follows declaration order.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BountyStatus {
    Open,
    Claimed,
    Submitted,
    Completed,
    Cancelled,
}

impl BountyStatus {
    /// Completed and Cancelled admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BountyStatus::Completed | BountyStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BountyStatus::Open => "open",
            BountyStatus::Claimed => "claimed",
            BountyStatus::Submitted => "submitted",
            BountyStatus::Completed => "completed",
            BountyStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BountyStatus {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "open" => Ok(BountyStatus::Open),
            "claimed" => Ok(BountyStatus::Claimed),
            "submitted" => Ok(BountyStatus::Submitted),
            "completed" => Ok(BountyStatus::Completed),
            "cancelled" => Ok(BountyStatus::Cancelled),
            other => Err(ClientError::Validation(format!(
                "unknown bounty status `{other}`"
            ))),
        }
    }
}

/// One bounty record. Created once, mutated in place by lifecycle
/// operations, never deleted; terminal records persist for history.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct Bounty {
    /// Discriminator for account type
    pub discriminator: [u8; 8],
    /// Sequence number assigned from `Protocol::total_bounties` at creation
    pub id: u64,
    /// Creator; only this address may approve or cancel
    pub poster: Pubkey,
    pub title: String,
    pub description: String,
    /// Escrowed payout amount
    pub reward_lamports: u64,
    pub created_at: i64,
    pub deadline: i64,
    pub status: BountyStatus,
    /// Set exactly once, when the bounty is claimed
    pub claimer: Option<Pubkey>,
    pub claimed_at: Option<i64>,
    /// Proof-of-completion URL
    pub submission: Option<String>,
    pub completed_at: Option<i64>,
}

impl Bounty {
    pub const DISCRIMINATOR: [u8; 8] = [237, 16, 105, 198, 19, 69, 242, 234];
    /// Fixed account allocation: all variable fields at their maximum.
    pub const MAX_SPACE: usize = 8
        + 8
        + 32
        + (4 + MAX_TITLE_LEN)
        + (4 + MAX_DESCRIPTION_LEN)
        + 8
        + 8
        + 8
        + 1
        + (1 + 32)
        + (1 + 8)
        + (1 + 4 + MAX_SUBMISSION_LEN)
        + (1 + 8);

    pub fn from_account_data(data: &[u8]) -> Result<Self, ClientError> {
        codec::decode_account(&Self::DISCRIMINATOR, data)
    }
}
