//! Instruction definitions and builders
//!
//! Each builder resolves the exact account list the on-chain program expects
//! and encodes the payload as an 8-byte discriminator followed by Borsh
//! arguments. Builders validate bounds locally so a bad request fails before
//! it reaches the network; they never sign and never submit.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

use crate::codec;
use crate::error::ClientError;
use crate::lifecycle;
use crate::pda;
use crate::state::{MAX_DESCRIPTION_LEN, MAX_SUBMISSION_LEN, MAX_TITLE_LEN};

/// Instruction discriminators, `sha256("global:<name>")[..8]`, fixed by the
/// program's IDL.
pub mod discriminators {
    pub const INITIALIZE: [u8; 8] = [175, 175, 109, 31, 13, 152, 155, 237];
    pub const CREATE_BOUNTY: [u8; 8] = [122, 90, 14, 143, 8, 125, 200, 2];
    pub const CLAIM_BOUNTY: [u8; 8] = [225, 157, 163, 238, 239, 169, 75, 226];
    pub const SUBMIT_WORK: [u8; 8] = [158, 80, 101, 51, 114, 130, 101, 253];
    pub const APPROVE_WORK: [u8; 8] = [181, 118, 45, 143, 204, 88, 237, 109];
    pub const CANCEL_BOUNTY: [u8; 8] = [79, 65, 107, 143, 128, 165, 135, 46];
}

/// Arguments for `create_bounty`, serialized in declaration order.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CreateBountyArgs {
    pub title: String,
    pub description: String,
    pub reward_lamports: u64,
    pub deadline_ts: i64,
}

/// Arguments for `submit_work`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct SubmitWorkArgs {
    pub submission_url: String,
}

/// Operations accepted by the bounty program.
///
/// The set is closed: adding an operation means extending this enum, its
/// discriminator table, and the lifecycle transition table together.
#[derive(Debug, Clone)]
pub enum BountyInstruction {
    /// Create the protocol singleton and fee vault.
    ///
    /// Accounts expected:
    /// 0. `[writable]` Protocol account (PDA)
    /// 1. `[]` Fee vault (PDA)
    /// 2. `[writable, signer]` Authority
    /// 3. `[]` System program
    Initialize,

    /// Create a bounty and move the reward into escrow atomically.
    ///
    /// Accounts expected:
    /// 0. `[writable]` Protocol account (PDA)
    /// 1. `[writable]` Bounty account (PDA)
    /// 2. `[writable]` Escrow account (PDA)
    /// 3. `[writable, signer]` Poster
    /// 4. `[]` System program
    CreateBounty(CreateBountyArgs),

    /// Reserve an open bounty for the calling claimer.
    ///
    /// Accounts expected:
    /// 0. `[writable]` Bounty account (PDA)
    /// 1. `[signer]` Claimer
    ClaimBounty,

    /// Attach a proof-of-completion URL to a claimed bounty.
    ///
    /// Accounts expected:
    /// 0. `[writable]` Bounty account (PDA)
    /// 1. `[signer]` Claimer
    SubmitWork(SubmitWorkArgs),

    /// Release the escrow: payout to the claimer, fee to the vault.
    ///
    /// Accounts expected:
    /// 0. `[writable]` Protocol account (PDA)
    /// 1. `[writable]` Bounty account (PDA)
    /// 2. `[writable]` Escrow account (PDA)
    /// 3. `[writable]` Fee vault (PDA)
    /// 4. `[writable]` Claimer
    /// 5. `[signer]` Poster
    /// 6. `[]` System program
    ApproveWork,

    /// Return the escrowed reward to the poster, fee-free.
    ///
    /// Accounts expected:
    /// 0. `[writable]` Bounty account (PDA)
    /// 1. `[writable]` Escrow account (PDA)
    /// 2. `[writable, signer]` Poster
    CancelBounty,
}

impl BountyInstruction {
    pub fn discriminator(&self) -> [u8; 8] {
        match self {
            BountyInstruction::Initialize => discriminators::INITIALIZE,
            BountyInstruction::CreateBounty(_) => discriminators::CREATE_BOUNTY,
            BountyInstruction::ClaimBounty => discriminators::CLAIM_BOUNTY,
            BountyInstruction::SubmitWork(_) => discriminators::SUBMIT_WORK,
            BountyInstruction::ApproveWork => discriminators::APPROVE_WORK,
            BountyInstruction::CancelBounty => discriminators::CANCEL_BOUNTY,
        }
    }

    /// Serializes the instruction payload, enforcing string bounds first.
    pub fn pack(&self) -> Result<Vec<u8>, ClientError> {
        match self {
            BountyInstruction::Initialize
            | BountyInstruction::ClaimBounty
            | BountyInstruction::ApproveWork
            | BountyInstruction::CancelBounty => Ok(self.discriminator().to_vec()),
            BountyInstruction::CreateBounty(args) => {
                codec::check_str_bound("title", &args.title, MAX_TITLE_LEN)?;
                codec::check_str_bound("description", &args.description, MAX_DESCRIPTION_LEN)?;
                lifecycle::check_reward_range(args.reward_lamports)?;
                codec::encode_instruction(self.discriminator(), args)
            }
            BountyInstruction::SubmitWork(args) => {
                codec::check_str_bound("submission_url", &args.submission_url, MAX_SUBMISSION_LEN)?;
                codec::encode_instruction(self.discriminator(), args)
            }
        }
    }
}

/// Builds the `initialize` instruction.
pub fn initialize(program_id: &Pubkey, authority: &Pubkey) -> Result<Instruction, ClientError> {
    let (protocol, _) = pda::protocol_address(program_id)?;
    let (fee_vault, _) = pda::fee_vault_address(program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(protocol, false),
            AccountMeta::new_readonly(fee_vault, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: BountyInstruction::Initialize.pack()?,
    })
}

/// Builds the `create_bounty` instruction for the given sequence id.
///
/// The id must be the protocol's current `total_bounties`; the facade reads
/// it from chain before calling here.
pub fn create_bounty(
    program_id: &Pubkey,
    poster: &Pubkey,
    bounty_id: u64,
    args: CreateBountyArgs,
) -> Result<Instruction, ClientError> {
    let (protocol, _) = pda::protocol_address(program_id)?;
    let (bounty, _) = pda::bounty_address(program_id, bounty_id)?;
    let (escrow, _) = pda::escrow_address(program_id, &bounty)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(protocol, false),
            AccountMeta::new(bounty, false),
            AccountMeta::new(escrow, false),
            AccountMeta::new(*poster, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: BountyInstruction::CreateBounty(args).pack()?,
    })
}

/// Builds the `claim_bounty` instruction.
pub fn claim_bounty(
    program_id: &Pubkey,
    bounty_id: u64,
    claimer: &Pubkey,
) -> Result<Instruction, ClientError> {
    let (bounty, _) = pda::bounty_address(program_id, bounty_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(bounty, false),
            AccountMeta::new_readonly(*claimer, true),
        ],
        data: BountyInstruction::ClaimBounty.pack()?,
    })
}

/// Builds the `submit_work` instruction.
pub fn submit_work(
    program_id: &Pubkey,
    bounty_id: u64,
    claimer: &Pubkey,
    submission_url: &str,
) -> Result<Instruction, ClientError> {
    let (bounty, _) = pda::bounty_address(program_id, bounty_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(bounty, false),
            AccountMeta::new_readonly(*claimer, true),
        ],
        data: BountyInstruction::SubmitWork(SubmitWorkArgs {
            submission_url: submission_url.to_string(),
        })
        .pack()?,
    })
}

/// Builds the `approve_work` instruction.
///
/// The claimer address comes from the bounty record; the protocol account is
/// writable because approval bumps its completion counter.
pub fn approve_work(
    program_id: &Pubkey,
    bounty_id: u64,
    poster: &Pubkey,
    claimer: &Pubkey,
) -> Result<Instruction, ClientError> {
    let (protocol, _) = pda::protocol_address(program_id)?;
    let (bounty, _) = pda::bounty_address(program_id, bounty_id)?;
    let (escrow, _) = pda::escrow_address(program_id, &bounty)?;
    let (fee_vault, _) = pda::fee_vault_address(program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(protocol, false),
            AccountMeta::new(bounty, false),
            AccountMeta::new(escrow, false),
            AccountMeta::new(fee_vault, false),
            AccountMeta::new(*claimer, false),
            AccountMeta::new_readonly(*poster, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: BountyInstruction::ApproveWork.pack()?,
    })
}

/// Builds the `cancel_bounty` instruction.
pub fn cancel_bounty(
    program_id: &Pubkey,
    bounty_id: u64,
    poster: &Pubkey,
) -> Result<Instruction, ClientError> {
    let (bounty, _) = pda::bounty_address(program_id, bounty_id)?;
    let (escrow, _) = pda::escrow_address(program_id, &bounty)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(bounty, false),
            AccountMeta::new(escrow, false),
            AccountMeta::new(*poster, true),
        ],
        data: BountyInstruction::CancelBounty.pack()?,
    })
}
