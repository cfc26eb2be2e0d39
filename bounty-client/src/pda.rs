//! Program-derived address helpers
//!
//! All protocol accounts live at deterministic addresses derived from stable
//! seed strings; the same inputs always yield the same address and bump.

use solana_program::pubkey::Pubkey;

use crate::error::ClientError;
use crate::state::seeds;

/// Address of the singleton protocol account.
pub fn protocol_address(program_id: &Pubkey) -> Result<(Pubkey, u8), ClientError> {
    Pubkey::try_find_program_address(&[seeds::PROTOCOL_SEED], program_id)
        .ok_or(ClientError::DerivationExhausted { seeds: "protocol" })
}

/// Address of the bounty account for a given sequence id.
pub fn bounty_address(program_id: &Pubkey, bounty_id: u64) -> Result<(Pubkey, u8), ClientError> {
    Pubkey::try_find_program_address(
        &[seeds::BOUNTY_SEED, &bounty_id.to_le_bytes()],
        program_id,
    )
    .ok_or(ClientError::DerivationExhausted { seeds: "bounty" })
}

/// Address of the escrow account holding a bounty's locked reward.
pub fn escrow_address(program_id: &Pubkey, bounty: &Pubkey) -> Result<(Pubkey, u8), ClientError> {
    Pubkey::try_find_program_address(&[seeds::ESCROW_SEED, bounty.as_ref()], program_id)
        .ok_or(ClientError::DerivationExhausted { seeds: "escrow" })
}

/// Address of the protocol fee vault.
pub fn fee_vault_address(program_id: &Pubkey) -> Result<(Pubkey, u8), ClientError> {
    Pubkey::try_find_program_address(&[seeds::FEE_VAULT_SEED], program_id)
        .ok_or(ClientError::DerivationExhausted { seeds: "fee_vault" })
}
