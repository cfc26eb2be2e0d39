//! Bounty query and instruction-building handlers
//!
//! Read handlers project on-chain state into JSON; write handlers validate
//! the request, build the unsigned instruction through the client facade,
//! and return a description of it for wallet-side signing.

use std::str::FromStr;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;
use warp::Rejection;

use bounty_client::{Bounty, BountyClient, BountyFilter, BountyStatus};

use super::generic::{reject_client_error, ApiError, ApiResponse};

// ============================================================================
// REQUEST/RESPONSE STRUCTURES
// ============================================================================

/// Query parameters for the bounty listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// JSON projection of one bounty record.
#[derive(Debug, Serialize, Deserialize)]
pub struct BountyView {
    pub id: u64,
    pub poster: String,
    pub title: String,
    pub description: String,
    pub reward_lamports: u64,
    pub created_at: i64,
    pub deadline: i64,
    pub status: String,
    pub claimer: Option<String>,
    pub claimed_at: Option<i64>,
    pub submission: Option<String>,
    pub completed_at: Option<i64>,
}

impl From<&Bounty> for BountyView {
    fn from(bounty: &Bounty) -> Self {
        Self {
            id: bounty.id,
            poster: bounty.poster.to_string(),
            title: bounty.title.clone(),
            description: bounty.description.clone(),
            reward_lamports: bounty.reward_lamports,
            created_at: bounty.created_at,
            deadline: bounty.deadline,
            status: bounty.status.as_str().to_string(),
            claimer: bounty.claimer.map(|c| c.to_string()),
            claimed_at: bounty.claimed_at,
            submission: bounty.submission.clone(),
            completed_at: bounty.completed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListBountiesResponse {
    pub bounties: Vec<BountyView>,
    pub total: usize,
}

/// Description of an unsigned instruction for wallet-side signing.
#[derive(Debug, Serialize, Deserialize)]
pub struct InstructionResponse {
    pub program_id: String,
    pub accounts: Vec<AccountMetaView>,
    pub data_base64: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountMetaView {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl From<&Instruction> for InstructionResponse {
    fn from(instruction: &Instruction) -> Self {
        Self {
            program_id: instruction.program_id.to_string(),
            accounts: instruction
                .accounts
                .iter()
                .map(|meta| AccountMetaView {
                    pubkey: meta.pubkey.to_string(),
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data_base64: STANDARD.encode(&instruction.data),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBountyRequest {
    pub poster: String,
    pub title: String,
    pub description: String,
    pub reward_lamports: u64,
    pub deadline_ts: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBountyResponse {
    pub bounty_id: u64,
    pub instruction: InstructionResponse,
}

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub claimer: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub claimer: String,
    pub submission_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PosterRequest {
    pub poster: String,
}

// ============================================================================
// HELPERS
// ============================================================================

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, Rejection> {
    Pubkey::from_str(value).map_err(|_| {
        warp::reject::custom(ApiError {
            status: warp::http::StatusCode::BAD_REQUEST,
            message: format!("{field} is not a valid base58 public key"),
        })
    })
}

fn parse_status_filter(value: Option<&str>) -> Result<Option<BountyStatus>, Rejection> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<BountyStatus>()
            .map(Some)
            .map_err(reject_client_error),
    }
}

// ============================================================================
// READ HANDLERS
// ============================================================================

/// Handler for GET /stats.
///
/// Returns the protocol counters, zeroed when the protocol is not yet
/// initialized.
pub async fn get_stats_handler(
    client: Arc<BountyClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let stats = client
        .get_protocol_stats()
        .await
        .map_err(reject_client_error)?;
    Ok(warp::reply::json(&ApiResponse::ok(stats)))
}

/// Handler for GET /bounties.
///
/// Applies client-side status filtering and pagination; the ledger has no
/// native query language.
pub async fn list_bounties_handler(
    query: ListQuery,
    client: Arc<BountyClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let filter = BountyFilter {
        status: parse_status_filter(query.status.as_deref())?,
        limit: query.limit,
        offset: query.offset,
    };

    debug!("GET /bounties with filter {:?}", filter);

    let entries = client
        .list_bounties(&filter)
        .await
        .map_err(reject_client_error)?;

    let response = ListBountiesResponse {
        total: entries.len(),
        bounties: entries
            .iter()
            .map(|entry| BountyView::from(&entry.bounty))
            .collect(),
    };
    Ok(warp::reply::json(&ApiResponse::ok(response)))
}

/// Handler for GET /bounties/:id.
///
/// A missing bounty is a 404, not a 500; absence is a normal read result
/// that only this endpoint's contract turns into an error.
pub async fn get_bounty_handler(
    bounty_id: u64,
    client: Arc<BountyClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let bounty = client
        .get_bounty(bounty_id)
        .await
        .map_err(reject_client_error)?;

    match bounty {
        Some(bounty) => Ok(warp::reply::json(&ApiResponse::ok(BountyView::from(
            &bounty,
        )))),
        None => Err(warp::reject::custom(ApiError {
            status: warp::http::StatusCode::NOT_FOUND,
            message: format!("Bounty {bounty_id} not found"),
        })),
    }
}

// ============================================================================
// INSTRUCTION-BUILDING HANDLERS
// ============================================================================

/// Handler for POST /bounties.
///
/// Returns the unsigned create instruction and the sequence id it targets.
pub async fn create_bounty_handler(
    request: CreateBountyRequest,
    client: Arc<BountyClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let poster = parse_pubkey("poster", &request.poster)?;
    let prepared = client
        .build_create_bounty(
            &poster,
            &request.title,
            &request.description,
            request.reward_lamports,
            request.deadline_ts,
        )
        .await
        .map_err(reject_client_error)?;

    let response = CreateBountyResponse {
        bounty_id: prepared.bounty_id,
        instruction: InstructionResponse::from(&prepared.instruction),
    };
    Ok(warp::reply::json(&ApiResponse::ok(response)))
}

/// Handler for POST /bounties/:id/claim.
pub async fn claim_bounty_handler(
    bounty_id: u64,
    request: ClaimRequest,
    client: Arc<BountyClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let claimer = parse_pubkey("claimer", &request.claimer)?;
    let instruction = client
        .build_claim_bounty(bounty_id, &claimer)
        .await
        .map_err(reject_client_error)?;
    Ok(warp::reply::json(&ApiResponse::ok(
        InstructionResponse::from(&instruction),
    )))
}

/// Handler for POST /bounties/:id/submit.
pub async fn submit_work_handler(
    bounty_id: u64,
    request: SubmitRequest,
    client: Arc<BountyClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let claimer = parse_pubkey("claimer", &request.claimer)?;
    let instruction = client
        .build_submit_work(bounty_id, &claimer, &request.submission_url)
        .await
        .map_err(reject_client_error)?;
    Ok(warp::reply::json(&ApiResponse::ok(
        InstructionResponse::from(&instruction),
    )))
}

/// Handler for POST /bounties/:id/approve.
pub async fn approve_work_handler(
    bounty_id: u64,
    request: PosterRequest,
    client: Arc<BountyClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let poster = parse_pubkey("poster", &request.poster)?;
    let instruction = client
        .build_approve_work(bounty_id, &poster)
        .await
        .map_err(reject_client_error)?;
    Ok(warp::reply::json(&ApiResponse::ok(
        InstructionResponse::from(&instruction),
    )))
}

/// Handler for POST /bounties/:id/cancel.
pub async fn cancel_bounty_handler(
    bounty_id: u64,
    request: PosterRequest,
    client: Arc<BountyClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let poster = parse_pubkey("poster", &request.poster)?;
    let instruction = client
        .build_cancel_bounty(bounty_id, &poster)
        .await
        .map_err(reject_client_error)?;
    Ok(warp::reply::json(&ApiResponse::ok(
        InstructionResponse::from(&instruction),
    )))
}
