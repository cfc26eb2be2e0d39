//! Bounty lifecycle state machine
//!
//! Authoritative definition of the lifecycle states and legal transitions:
//!
//! ```text
//! Open -> Claimed -> Submitted -> Completed
//!   \         \
//!    +---------+--> Cancelled
//! ```
//!
//! Completed and Cancelled are terminal. The on-chain program enforces the
//! same rules; the checks here let a client fail fast before spending a
//! network round-trip on a transaction the program will reject. The `apply_*`
//! functions model the full effect of each transition on the records, which
//! is what the ledger performs on success.

use solana_program::pubkey::Pubkey;

use crate::codec;
use crate::error::ClientError;
use crate::state::{
    Bounty, BountyStatus, Protocol, MAX_DESCRIPTION_LEN, MAX_REWARD_LAMPORTS, MAX_SUBMISSION_LEN,
    MAX_TITLE_LEN, MIN_REWARD_LAMPORTS,
};

/// Operations that advance an existing bounty through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    Claim,
    Submit,
    Approve,
    Cancel,
}

impl LifecycleOp {
    pub const ALL: [LifecycleOp; 4] = [
        LifecycleOp::Claim,
        LifecycleOp::Submit,
        LifecycleOp::Approve,
        LifecycleOp::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleOp::Claim => "claim_bounty",
            LifecycleOp::Submit => "submit_work",
            LifecycleOp::Approve => "approve_work",
            LifecycleOp::Cancel => "cancel_bounty",
        }
    }
}

impl std::fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lamport movements the escrow performs on an approval payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub to_claimer: u64,
    pub to_fee_vault: u64,
}

/// Status a bounty moves to when `op` is applied in `from`.
///
/// Every (status, op) pair outside the transition table is rejected with
/// `InvalidStateTransition`; terminal states admit nothing.
pub fn next_status(from: BountyStatus, op: LifecycleOp) -> Result<BountyStatus, ClientError> {
    use BountyStatus::*;
    use LifecycleOp::*;
    match (from, op) {
        (Open, Claim) => Ok(Claimed),
        (Claimed, Submit) => Ok(Submitted),
        (Submitted, Approve) => Ok(Completed),
        (Open, Cancel) | (Claimed, Cancel) => Ok(Cancelled),
        _ => Err(ClientError::InvalidStateTransition {
            operation: op,
            status: from,
        }),
    }
}

/// Checks a reward against the configured escrow bounds.
pub fn check_reward_range(reward_lamports: u64) -> Result<(), ClientError> {
    if !(MIN_REWARD_LAMPORTS..=MAX_REWARD_LAMPORTS).contains(&reward_lamports) {
        return Err(ClientError::Validation(format!(
            "reward must be between {MIN_REWARD_LAMPORTS} and {MAX_REWARD_LAMPORTS} lamports, got {reward_lamports}"
        )));
    }
    Ok(())
}

/// Validates creation parameters against the protocol bounds.
pub fn validate_create_params(
    title: &str,
    description: &str,
    reward_lamports: u64,
    deadline_ts: i64,
    now: i64,
) -> Result<(), ClientError> {
    codec::check_str_bound("title", title, MAX_TITLE_LEN)?;
    codec::check_str_bound("description", description, MAX_DESCRIPTION_LEN)?;
    check_reward_range(reward_lamports)?;
    if deadline_ts <= now {
        return Err(ClientError::Validation(format!(
            "deadline {deadline_ts} must be in the future (now {now})"
        )));
    }
    Ok(())
}

/// Guards a claim attempt: open, before the deadline, not by the poster.
pub fn check_claim(bounty: &Bounty, claimer: &Pubkey, now: i64) -> Result<(), ClientError> {
    next_status(bounty.status, LifecycleOp::Claim)?;
    if now >= bounty.deadline {
        return Err(ClientError::DeadlinePassed {
            deadline: bounty.deadline,
            now,
        });
    }
    if bounty.poster == *claimer {
        return Err(ClientError::Validation(
            "poster cannot claim their own bounty".to_string(),
        ));
    }
    Ok(())
}

/// Guards a work submission: claimed by the caller, URL in bounds, on time.
pub fn check_submit(
    bounty: &Bounty,
    claimer: &Pubkey,
    submission_url: &str,
    now: i64,
) -> Result<(), ClientError> {
    next_status(bounty.status, LifecycleOp::Submit)?;
    codec::check_str_bound("submission_url", submission_url, MAX_SUBMISSION_LEN)?;
    if bounty.claimer.as_ref() != Some(claimer) {
        return Err(ClientError::Validation(
            "caller is not the claimer of this bounty".to_string(),
        ));
    }
    if now >= bounty.deadline {
        return Err(ClientError::DeadlinePassed {
            deadline: bounty.deadline,
            now,
        });
    }
    Ok(())
}

/// Guards an approval: submitted, and only the poster may release funds.
pub fn check_approve(bounty: &Bounty, poster: &Pubkey) -> Result<(), ClientError> {
    next_status(bounty.status, LifecycleOp::Approve)?;
    if bounty.poster != *poster {
        return Err(ClientError::Validation(
            "caller is not the poster of this bounty".to_string(),
        ));
    }
    Ok(())
}

/// Guards a cancellation: only the poster, and only before work is submitted.
pub fn check_cancel(bounty: &Bounty, poster: &Pubkey) -> Result<(), ClientError> {
    next_status(bounty.status, LifecycleOp::Cancel)?;
    if bounty.poster != *poster {
        return Err(ClientError::Validation(
            "caller is not the poster of this bounty".to_string(),
        ));
    }
    Ok(())
}

/// Creates a bounty record and applies the creation effects to the protocol:
/// id assignment from the counter, counter increment, volume accumulation.
///
/// Mirrors what the program does on a successful `create_bounty`; the
/// escrowed reward moves from the poster to the escrow account alongside.
pub fn apply_create(
    protocol: &mut Protocol,
    poster: Pubkey,
    title: String,
    description: String,
    reward_lamports: u64,
    deadline_ts: i64,
    now: i64,
) -> Result<Bounty, ClientError> {
    validate_create_params(&title, &description, reward_lamports, deadline_ts, now)?;
    let bounty = Bounty {
        discriminator: Bounty::DISCRIMINATOR,
        id: protocol.total_bounties,
        poster,
        title,
        description,
        reward_lamports,
        created_at: now,
        deadline: deadline_ts,
        status: BountyStatus::Open,
        claimer: None,
        claimed_at: None,
        submission: None,
        completed_at: None,
    };
    protocol.total_bounties += 1;
    protocol.total_volume += reward_lamports;
    Ok(bounty)
}

/// Applies a claim: records the claimer and claim time.
pub fn apply_claim(bounty: &mut Bounty, claimer: Pubkey, now: i64) -> Result<(), ClientError> {
    check_claim(bounty, &claimer, now)?;
    bounty.status = BountyStatus::Claimed;
    bounty.claimer = Some(claimer);
    bounty.claimed_at = Some(now);
    Ok(())
}

/// Applies a work submission: records the proof URL.
pub fn apply_submit(
    bounty: &mut Bounty,
    claimer: &Pubkey,
    submission_url: String,
    now: i64,
) -> Result<(), ClientError> {
    check_submit(bounty, claimer, &submission_url, now)?;
    bounty.status = BountyStatus::Submitted;
    bounty.submission = Some(submission_url);
    Ok(())
}

/// Applies an approval: terminal payout split between claimer and fee vault.
///
/// The escrow is drawn down exactly once, in full.
pub fn apply_approve(
    bounty: &mut Bounty,
    protocol: &mut Protocol,
    poster: &Pubkey,
    now: i64,
) -> Result<Payout, ClientError> {
    check_approve(bounty, poster)?;
    let (fee, payout) = protocol.fee_for(bounty.reward_lamports);
    bounty.status = BountyStatus::Completed;
    bounty.completed_at = Some(now);
    protocol.total_completed += 1;
    Ok(Payout {
        to_claimer: payout,
        to_fee_vault: fee,
    })
}

/// Applies a cancellation; returns the full refund owed to the poster.
pub fn apply_cancel(bounty: &mut Bounty, poster: &Pubkey) -> Result<u64, ClientError> {
    check_cancel(bounty, poster)?;
    bounty.status = BountyStatus::Cancelled;
    Ok(bounty.reward_lamports)
}
