//! Shared test helpers for service tests
//!
//! Provides configuration builders and on-chain account fixtures used by the
//! API integration tests.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use borsh::BorshSerialize;
use serde_json::json;
use solana_program::pubkey::Pubkey;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bounty_client::state::{Bounty, BountyStatus, Protocol};
use bounty_service::config::{ApiConfig, ChainConfig, Config};

/// Deadline far enough in the future for any test run.
pub const FAR_DEADLINE: i64 = 4_000_000_000;

#[allow(dead_code)]
pub fn poster() -> Pubkey {
    Pubkey::new_from_array([1u8; 32])
}

#[allow(dead_code)]
pub fn claimer() -> Pubkey {
    Pubkey::new_from_array([2u8; 32])
}

/// Builds a service config pointing at the given RPC endpoint.
pub fn build_test_config(rpc_url: &str, program_id: &Pubkey) -> Config {
    Config {
        chain: ChainConfig {
            name: "testnet".to_string(),
            rpc_url: rpc_url.to_string(),
            program_id: program_id.to_string(),
        },
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
    }
}

#[allow(dead_code)]
pub fn test_protocol(total_bounties: u64) -> Protocol {
    let mut protocol = Protocol::new(Pubkey::new_from_array([9u8; 32]));
    protocol.total_bounties = total_bounties;
    protocol
}

#[allow(dead_code)]
pub fn test_bounty(id: u64, status: BountyStatus) -> Bounty {
    Bounty {
        discriminator: Bounty::DISCRIMINATOR,
        id,
        poster: poster(),
        title: format!("bounty {id}"),
        description: "service fixture".to_string(),
        reward_lamports: 1_000_000_000,
        created_at: 1_700_000_000,
        deadline: FAR_DEADLINE,
        status,
        claimer: match status {
            BountyStatus::Open => None,
            _ => Some(claimer()),
        },
        claimed_at: match status {
            BountyStatus::Open => None,
            _ => Some(1_700_000_100),
        },
        submission: match status {
            BountyStatus::Submitted | BountyStatus::Completed => {
                Some("https://example.com/proof".to_string())
            }
            _ => None,
        },
        completed_at: None,
    }
}

#[allow(dead_code)]
pub fn account_base64<T: BorshSerialize>(record: &T) -> String {
    STANDARD.encode(record.try_to_vec().expect("borsh serialize record"))
}

/// Mounts a getAccountInfo mock for one address on the mock RPC node.
#[allow(dead_code)]
pub async fn mock_account(server: &MockServer, address: &Pubkey, data_base64: Option<String>) {
    let value = match data_base64 {
        Some(data) => json!({ "data": [data, "base64"] }),
        None => json!(null),
    };
    Mock::given(method("POST"))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "method": "getAccountInfo",
            "params": [address.to_string(), { "encoding": "base64" }],
            "id": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": { "value": value },
            "id": 1
        })))
        .mount(server)
        .await;
}

/// Mounts a getProgramAccounts mock returning the given bounty fixtures.
#[allow(dead_code)]
pub async fn mock_program_accounts(
    server: &MockServer,
    program_id: &Pubkey,
    bounties: &[Bounty],
) {
    let entries: Vec<serde_json::Value> = bounties
        .iter()
        .map(|bounty| {
            json!({
                "pubkey": Pubkey::new_unique().to_string(),
                "account": { "data": [account_base64(bounty), "base64"] }
            })
        })
        .collect();

    Mock::given(method("POST"))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "method": "getProgramAccounts",
            "params": [
                program_id.to_string(),
                {
                    "encoding": "base64",
                    "filters": [
                        { "memcmp": { "offset": 0, "bytes": bs58_discriminator() } }
                    ]
                }
            ],
            "id": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": entries,
            "id": 1
        })))
        .mount(server)
        .await;
}

#[allow(dead_code)]
fn bs58_discriminator() -> String {
    bs58::encode(Bounty::DISCRIMINATOR).into_string()
}
