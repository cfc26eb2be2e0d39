//! Bounty protocol RPC client
//!
//! Read/query surface plus unsigned-transaction building over Solana
//! JSON-RPC. Builders fetch the on-chain state an operation depends on,
//! validate locally so bad requests fail before the network, and return an
//! unsigned instruction for the caller to sign and submit. The client holds
//! no keys and no mutable state; methods may be awaited concurrently.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use tracing::warn;

use crate::codec;
use crate::error::ClientError;
use crate::instruction::{self, CreateBountyArgs};
use crate::lifecycle;
use crate::pda;
use crate::state::{Bounty, BountyStatus, Protocol, DEFAULT_FEE_BPS};

// ============================================================================
// JSON-RPC TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    message: String,
    #[serde(default)]
    data: Option<JsonRpcErrorData>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorData {
    #[serde(default)]
    logs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResult {
    value: Option<RpcAccount>,
}

#[derive(Debug, Deserialize)]
struct RpcAccount {
    data: (String, String),
}

#[derive(Debug, Deserialize)]
struct ProgramAccountResult {
    pubkey: String,
    account: RpcAccount,
}

#[derive(Debug, Deserialize)]
struct SignatureStatusesResult {
    value: Vec<Option<SignatureStatus>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    confirmation_status: Option<String>,
    err: Option<serde_json::Value>,
}

// ============================================================================
// QUERY RESULTS
// ============================================================================

/// Protocol counters, zeroed (with the program's default fee rate) when the
/// protocol account does not exist yet.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolStats {
    pub total_bounties: u64,
    pub total_completed: u64,
    pub total_volume: u64,
    pub fee_bps: u16,
}

#[derive(Debug, Clone)]
pub struct BountyWithAddress {
    pub address: Pubkey,
    pub bounty: Bounty,
}

/// Client-side listing filter. The ledger has no query language, so status
/// filtering and pagination happen after the full program scan.
#[derive(Debug, Clone, Default)]
pub struct BountyFilter {
    pub status: Option<BountyStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// An unsigned create instruction together with the sequence id it targets.
#[derive(Debug, Clone)]
pub struct PreparedCreate {
    pub bounty_id: u64,
    pub instruction: Instruction,
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct BountyClient {
    client: Client,
    rpc_url: String,
    program_id: Pubkey,
}

impl BountyClient {
    pub fn new(rpc_url: &str, program_id: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .no_proxy()
            .build()
            .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {e}")))?;

        let program_id = Pubkey::from_str(program_id).map_err(|_| {
            ClientError::Validation("invalid program id (expected base58 string)".to_string())
        })?;

        Ok(Self {
            client,
            rpc_url: rpc_url.to_string(),
            program_id,
        })
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    async fn rpc_call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<JsonRpcResponse<T>, ClientError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        let response: JsonRpcResponse<T> = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("failed to call {method}: {e}")))?
            .json()
            .await
            .map_err(|e| ClientError::Network(format!("failed to parse {method} response: {e}")))?;

        Ok(response)
    }

    /// Fetches raw account data; `Ok(None)` when the account does not exist.
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ClientError> {
        let params = json!([address.to_string(), { "encoding": "base64" }]);
        let response: JsonRpcResponse<AccountInfoResult> =
            self.rpc_call("getAccountInfo", params).await?;

        if let Some(error) = response.error {
            return Err(ClientError::Network(format!("rpc error: {}", error.message)));
        }

        let Some(result) = response.result else {
            return Ok(None);
        };
        let Some(account) = result.value else {
            return Ok(None);
        };

        codec::decode_base64(&account.data.0).map(Some)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Reads the protocol counters. Before initialization the account does
    /// not exist; zeroed defaults are returned instead of an error.
    pub async fn get_protocol_stats(&self) -> Result<ProtocolStats, ClientError> {
        let (protocol_pda, _) = pda::protocol_address(&self.program_id)?;
        match self.get_account_data(&protocol_pda).await? {
            Some(data) => {
                let protocol = Protocol::from_account_data(&data)?;
                Ok(ProtocolStats {
                    total_bounties: protocol.total_bounties,
                    total_completed: protocol.total_completed,
                    total_volume: protocol.total_volume,
                    fee_bps: protocol.fee_bps,
                })
            }
            None => Ok(ProtocolStats {
                total_bounties: 0,
                total_completed: 0,
                total_volume: 0,
                fee_bps: DEFAULT_FEE_BPS,
            }),
        }
    }

    /// Fetches one bounty by sequence id; `Ok(None)` when absent.
    pub async fn get_bounty(&self, bounty_id: u64) -> Result<Option<Bounty>, ClientError> {
        let (bounty_pda, _) = pda::bounty_address(&self.program_id, bounty_id)?;
        match self.get_account_data(&bounty_pda).await? {
            Some(data) => Ok(Some(Bounty::from_account_data(&data)?)),
            None => Ok(None),
        }
    }

    /// Lists bounty accounts owned by the program, filtered client-side.
    ///
    /// Results are ordered by id so pagination is stable across calls.
    pub async fn list_bounties(
        &self,
        filter: &BountyFilter,
    ) -> Result<Vec<BountyWithAddress>, ClientError> {
        let params = json!([
            self.program_id.to_string(),
            {
                "encoding": "base64",
                "filters": [
                    { "memcmp": { "offset": 0, "bytes": bs58::encode(Bounty::DISCRIMINATOR).into_string() } }
                ]
            }
        ]);

        let response: JsonRpcResponse<Vec<ProgramAccountResult>> =
            self.rpc_call("getProgramAccounts", params).await?;

        if let Some(error) = response.error {
            return Err(ClientError::Network(format!("rpc error: {}", error.message)));
        }

        let accounts = response.result.unwrap_or_default();
        let mut bounties = Vec::new();
        for account in accounts {
            let address = Pubkey::from_str(&account.pubkey).map_err(|_| {
                ClientError::AccountParse(format!(
                    "invalid pubkey in getProgramAccounts response: {}",
                    account.pubkey
                ))
            })?;
            let data = codec::decode_base64(&account.account.data.0)?;
            match Bounty::from_account_data(&data) {
                Ok(bounty) => bounties.push(BountyWithAddress { address, bounty }),
                Err(e) => {
                    warn!("skipping undecodable bounty account {address}: {e}");
                }
            }
        }

        bounties.sort_by_key(|entry| entry.bounty.id);

        let filtered = bounties
            .into_iter()
            .filter(|entry| {
                filter
                    .status
                    .map_or(true, |status| entry.bounty.status == status)
            })
            .skip(filter.offset.unwrap_or(0))
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(filtered)
    }

    // ------------------------------------------------------------------
    // Unsigned transaction building
    // ------------------------------------------------------------------

    /// Builds the one-time protocol initialization instruction.
    pub async fn build_initialize(&self, authority: &Pubkey) -> Result<Instruction, ClientError> {
        let (protocol_pda, _) = pda::protocol_address(&self.program_id)?;
        if self.get_account_data(&protocol_pda).await?.is_some() {
            return Err(ClientError::Validation(
                "protocol is already initialized".to_string(),
            ));
        }
        instruction::initialize(&self.program_id, authority)
    }

    /// Builds a create instruction, assigning the next sequence id from the
    /// protocol counter. The ledger's account write-lock arbitrates
    /// concurrent creates targeting the same id; losers must rebuild.
    pub async fn build_create_bounty(
        &self,
        poster: &Pubkey,
        title: &str,
        description: &str,
        reward_lamports: u64,
        deadline_ts: i64,
    ) -> Result<PreparedCreate, ClientError> {
        lifecycle::validate_create_params(title, description, reward_lamports, deadline_ts, unix_now())?;

        let (protocol_pda, _) = pda::protocol_address(&self.program_id)?;
        let data = self
            .get_account_data(&protocol_pda)
            .await?
            .ok_or(ClientError::AccountNotFound {
                address: protocol_pda,
            })?;
        let protocol = Protocol::from_account_data(&data)?;

        let bounty_id = protocol.total_bounties;
        let instruction = instruction::create_bounty(
            &self.program_id,
            poster,
            bounty_id,
            CreateBountyArgs {
                title: title.to_string(),
                description: description.to_string(),
                reward_lamports,
                deadline_ts,
            },
        )?;

        Ok(PreparedCreate {
            bounty_id,
            instruction,
        })
    }

    /// Builds a claim instruction after checking the bounty is claimable.
    pub async fn build_claim_bounty(
        &self,
        bounty_id: u64,
        claimer: &Pubkey,
    ) -> Result<Instruction, ClientError> {
        let bounty = self.get_bounty_required(bounty_id).await?;
        lifecycle::check_claim(&bounty, claimer, unix_now())?;
        instruction::claim_bounty(&self.program_id, bounty_id, claimer)
    }

    /// Builds a submit instruction after checking the caller holds the claim.
    pub async fn build_submit_work(
        &self,
        bounty_id: u64,
        claimer: &Pubkey,
        submission_url: &str,
    ) -> Result<Instruction, ClientError> {
        let bounty = self.get_bounty_required(bounty_id).await?;
        lifecycle::check_submit(&bounty, claimer, submission_url, unix_now())?;
        instruction::submit_work(&self.program_id, bounty_id, claimer, submission_url)
    }

    /// Builds an approve instruction; the claimer payout address comes from
    /// the bounty record.
    pub async fn build_approve_work(
        &self,
        bounty_id: u64,
        poster: &Pubkey,
    ) -> Result<Instruction, ClientError> {
        let bounty = self.get_bounty_required(bounty_id).await?;
        lifecycle::check_approve(&bounty, poster)?;
        let claimer = bounty.claimer.ok_or_else(|| {
            ClientError::AccountParse("submitted bounty has no claimer".to_string())
        })?;
        instruction::approve_work(&self.program_id, bounty_id, poster, &claimer)
    }

    /// Builds a cancel instruction refunding the escrow to the poster.
    pub async fn build_cancel_bounty(
        &self,
        bounty_id: u64,
        poster: &Pubkey,
    ) -> Result<Instruction, ClientError> {
        let bounty = self.get_bounty_required(bounty_id).await?;
        lifecycle::check_cancel(&bounty, poster)?;
        instruction::cancel_bounty(&self.program_id, bounty_id, poster)
    }

    async fn get_bounty_required(&self, bounty_id: u64) -> Result<Bounty, ClientError> {
        let (bounty_pda, _) = pda::bounty_address(&self.program_id, bounty_id)?;
        let data = self
            .get_account_data(&bounty_pda)
            .await?
            .ok_or(ClientError::AccountNotFound {
                address: bounty_pda,
            })?;
        Bounty::from_account_data(&data)
    }

    // ------------------------------------------------------------------
    // Submission of caller-signed transactions
    // ------------------------------------------------------------------

    /// Submits a caller-signed, base64-encoded transaction.
    ///
    /// On-chain rejection (including a lost claim race) surfaces as
    /// `LedgerRejected` with the program's logs; it is not a transient fault
    /// and must not be blindly retried.
    pub async fn send_transaction(&self, transaction_base64: &str) -> Result<String, ClientError> {
        let params = json!([transaction_base64, { "encoding": "base64" }]);
        let response: JsonRpcResponse<String> = self.rpc_call("sendTransaction", params).await?;

        if let Some(error) = response.error {
            return Err(ClientError::LedgerRejected {
                message: error.message,
                logs: error.data.map(|d| d.logs).unwrap_or_default(),
            });
        }

        response
            .result
            .ok_or_else(|| ClientError::Network("sendTransaction returned no result".to_string()))
    }

    /// Checks whether a submitted transaction has been confirmed.
    ///
    /// `Ok(false)` means not yet visible; a transaction that landed with an
    /// on-chain error surfaces as `LedgerRejected`.
    pub async fn confirm_transaction(&self, signature: &str) -> Result<bool, ClientError> {
        let params = json!([[signature]]);
        let response: JsonRpcResponse<SignatureStatusesResult> =
            self.rpc_call("getSignatureStatuses", params).await?;

        if let Some(error) = response.error {
            return Err(ClientError::Network(format!("rpc error: {}", error.message)));
        }

        let statuses = response
            .result
            .ok_or_else(|| ClientError::Network("getSignatureStatuses returned no result".to_string()))?;

        match statuses.value.into_iter().next().flatten() {
            Some(status) => {
                if let Some(err) = status.err {
                    return Err(ClientError::LedgerRejected {
                        message: format!("transaction {signature} failed: {err}"),
                        logs: Vec::new(),
                    });
                }
                Ok(matches!(
                    status.confirmation_status.as_deref(),
                    Some("confirmed") | Some("finalized")
                ))
            }
            None => Ok(false),
        }
    }
}

/// Current Unix time, used for client-side deadline checks.
fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
