//! Integration tests for the bounty RPC client
//!
//! These tests run the client against a mock JSON-RPC server and verify
//! account decoding, fast-fail validation, and unsigned instruction building
//! end to end.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use borsh::BorshSerialize;
use serde_json::json;
use solana_program::pubkey::Pubkey;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bounty_client::client::{BountyClient, BountyFilter};
use bounty_client::error::ClientError;
use bounty_client::pda;
use bounty_client::state::{Bounty, BountyStatus, Protocol};

const FAR_DEADLINE: i64 = 4_000_000_000;
const PAST_DEADLINE: i64 = 1_000_000_000;

fn poster() -> Pubkey {
    Pubkey::new_from_array([1u8; 32])
}

fn claimer() -> Pubkey {
    Pubkey::new_from_array([2u8; 32])
}

fn test_protocol(total_bounties: u64) -> Protocol {
    let mut protocol = Protocol::new(Pubkey::new_from_array([9u8; 32]));
    protocol.total_bounties = total_bounties;
    protocol.total_completed = 1;
    protocol.total_volume = 750_000_000;
    protocol
}

fn test_bounty(id: u64, status: BountyStatus, deadline: i64) -> Bounty {
    Bounty {
        discriminator: Bounty::DISCRIMINATOR,
        id,
        poster: poster(),
        title: format!("bounty {id}"),
        description: "integration fixture".to_string(),
        reward_lamports: 1_000_000_000,
        created_at: PAST_DEADLINE - 100,
        deadline,
        status,
        claimer: match status {
            BountyStatus::Open => None,
            _ => Some(claimer()),
        },
        claimed_at: match status {
            BountyStatus::Open => None,
            _ => Some(PAST_DEADLINE - 50),
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

fn account_base64<T: BorshSerialize>(record: &T) -> String {
    STANDARD.encode(record.try_to_vec().expect("borsh serialize record"))
}

/// Mounts a getAccountInfo mock for one address.
async fn mock_account(server: &MockServer, address: &Pubkey, data_base64: Option<String>) {
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

async fn client_for(server: &MockServer, program_id: &Pubkey) -> BountyClient {
    BountyClient::new(&server.uri(), &program_id.to_string()).expect("create client")
}

/// What is tested: protocol stats fall back to zeroed defaults pre-initialization
/// Why: a missing protocol account is a normal state, not an error
#[tokio::test]
async fn test_protocol_stats_default_when_absent() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let (protocol_pda, _) = pda::protocol_address(&program_id).unwrap();
    mock_account(&server, &protocol_pda, None).await;

    let client = client_for(&server, &program_id).await;
    let stats = client.get_protocol_stats().await.expect("fetch stats");
    assert_eq!(stats.total_bounties, 0);
    assert_eq!(stats.total_completed, 0);
    assert_eq!(stats.total_volume, 0);
    assert_eq!(stats.fee_bps, 250);
}

/// What is tested: protocol stats decode from the on-chain layout
/// Why: base64 decoding + discriminator check + Borsh parse must stay wired
#[tokio::test]
async fn test_protocol_stats_decodes_account() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let (protocol_pda, _) = pda::protocol_address(&program_id).unwrap();
    mock_account(&server, &protocol_pda, Some(account_base64(&test_protocol(12)))).await;

    let client = client_for(&server, &program_id).await;
    let stats = client.get_protocol_stats().await.expect("fetch stats");
    assert_eq!(stats.total_bounties, 12);
    assert_eq!(stats.total_completed, 1);
    assert_eq!(stats.total_volume, 750_000_000);
}

#[tokio::test]
async fn test_get_bounty_absent_is_none() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let (bounty_pda, _) = pda::bounty_address(&program_id, 3).unwrap();
    mock_account(&server, &bounty_pda, None).await;

    let client = client_for(&server, &program_id).await;
    assert!(client.get_bounty(3).await.expect("fetch bounty").is_none());
}

#[tokio::test]
async fn test_get_bounty_decodes_record() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let bounty = test_bounty(3, BountyStatus::Claimed, FAR_DEADLINE);
    let (bounty_pda, _) = pda::bounty_address(&program_id, 3).unwrap();
    mock_account(&server, &bounty_pda, Some(account_base64(&bounty))).await;

    let client = client_for(&server, &program_id).await;
    let fetched = client.get_bounty(3).await.expect("fetch bounty").expect("present");
    assert_eq!(fetched.id, 3);
    assert_eq!(fetched.status, BountyStatus::Claimed);
    assert_eq!(fetched.claimer, Some(claimer()));
}

/// What is tested: listing filters by status, orders by id, skips garbage
/// Why: the scan is the only query path; it must tolerate foreign accounts
#[tokio::test]
async fn test_list_bounties_filters_and_orders() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();

    let open_late = test_bounty(5, BountyStatus::Open, FAR_DEADLINE);
    let open_early = test_bounty(1, BountyStatus::Open, FAR_DEADLINE);
    let cancelled = test_bounty(2, BountyStatus::Cancelled, FAR_DEADLINE);

    let entries = json!([
        { "pubkey": Pubkey::new_unique().to_string(), "account": { "data": [account_base64(&open_late), "base64"] } },
        { "pubkey": Pubkey::new_unique().to_string(), "account": { "data": [account_base64(&cancelled), "base64"] } },
        // Bounty discriminator but truncated body: skipped with a warning.
        { "pubkey": Pubkey::new_unique().to_string(), "account": { "data": [STANDARD.encode(Bounty::DISCRIMINATOR), "base64"] } },
        { "pubkey": Pubkey::new_unique().to_string(), "account": { "data": [account_base64(&open_early), "base64"] } },
    ]);

    Mock::given(method("POST"))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "method": "getProgramAccounts",
            "params": [
                program_id.to_string(),
                {
                    "encoding": "base64",
                    "filters": [
                        { "memcmp": { "offset": 0, "bytes": bs58::encode(Bounty::DISCRIMINATOR).into_string() } }
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
        .mount(&server)
        .await;

    let client = client_for(&server, &program_id).await;

    let all = client
        .list_bounties(&BountyFilter::default())
        .await
        .expect("list bounties");
    assert_eq!(all.len(), 3);
    assert_eq!(
        all.iter().map(|e| e.bounty.id).collect::<Vec<_>>(),
        vec![1, 2, 5]
    );

    let open_only = client
        .list_bounties(&BountyFilter {
            status: Some(BountyStatus::Open),
            ..Default::default()
        })
        .await
        .expect("list open bounties");
    assert_eq!(open_only.len(), 2);

    let paged = client
        .list_bounties(&BountyFilter {
            status: Some(BountyStatus::Open),
            limit: Some(1),
            offset: Some(1),
        })
        .await
        .expect("list paged");
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].bounty.id, 5);
}

/// What is tested: create builder assigns the id from the protocol counter
/// Why: ids come from on-chain state, never from the caller
#[tokio::test]
async fn test_build_create_assigns_next_id() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let (protocol_pda, _) = pda::protocol_address(&program_id).unwrap();
    mock_account(&server, &protocol_pda, Some(account_base64(&test_protocol(7)))).await;

    let client = client_for(&server, &program_id).await;
    let prepared = client
        .build_create_bounty(&poster(), "title", "description", 500_000_000, FAR_DEADLINE)
        .await
        .expect("build create");

    assert_eq!(prepared.bounty_id, 7);
    let (bounty_pda, _) = pda::bounty_address(&program_id, 7).unwrap();
    assert_eq!(prepared.instruction.program_id, program_id);
    assert_eq!(prepared.instruction.accounts[1].pubkey, bounty_pda);
}

/// What is tested: create fails fast before any RPC when params are invalid
/// Why: validation errors must not cost a network round-trip
#[tokio::test]
async fn test_build_create_validates_before_rpc() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let client = client_for(&server, &program_id).await;

    let err = client
        .build_create_bounty(&poster(), "title", "description", 1, FAR_DEADLINE)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_build_create_requires_initialized_protocol() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let (protocol_pda, _) = pda::protocol_address(&program_id).unwrap();
    mock_account(&server, &protocol_pda, None).await;

    let client = client_for(&server, &program_id).await;
    let err = client
        .build_create_bounty(&poster(), "title", "description", 500_000_000, FAR_DEADLINE)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AccountNotFound { .. }));
}

/// What is tested: claim builder rejects a bounty that is already claimed
/// Why: fast-fail mirrors the on-chain state machine
#[tokio::test]
async fn test_build_claim_rejects_claimed_bounty() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let bounty = test_bounty(0, BountyStatus::Claimed, FAR_DEADLINE);
    let (bounty_pda, _) = pda::bounty_address(&program_id, 0).unwrap();
    mock_account(&server, &bounty_pda, Some(account_base64(&bounty))).await;

    let client = client_for(&server, &program_id).await;
    let err = client
        .build_claim_bounty(0, &Pubkey::new_from_array([4u8; 32]))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidStateTransition { .. }));
}

/// What is tested: claim builder rejects an expired bounty with DeadlinePassed
/// Why: expiry wins over an otherwise-open status
#[tokio::test]
async fn test_build_claim_rejects_expired_bounty() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let bounty = test_bounty(0, BountyStatus::Open, PAST_DEADLINE);
    let (bounty_pda, _) = pda::bounty_address(&program_id, 0).unwrap();
    mock_account(&server, &bounty_pda, Some(account_base64(&bounty))).await;

    let client = client_for(&server, &program_id).await;
    let err = client.build_claim_bounty(0, &claimer()).await.unwrap_err();
    assert!(matches!(err, ClientError::DeadlinePassed { .. }));
}

/// What is tested: approve builder resolves the claimer from the record
/// Why: the payout account must be the claimer stored on chain
#[tokio::test]
async fn test_build_approve_resolves_claimer() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let bounty = test_bounty(2, BountyStatus::Submitted, FAR_DEADLINE);
    let (bounty_pda, _) = pda::bounty_address(&program_id, 2).unwrap();
    mock_account(&server, &bounty_pda, Some(account_base64(&bounty))).await;

    let client = client_for(&server, &program_id).await;
    let ix = client
        .build_approve_work(2, &poster())
        .await
        .expect("build approve");
    assert_eq!(ix.accounts[4].pubkey, claimer());
    assert!(ix.accounts[4].is_writable);
    assert!(ix.accounts[5].is_signer);
}

#[tokio::test]
async fn test_build_cancel_from_claimed() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let bounty = test_bounty(1, BountyStatus::Claimed, FAR_DEADLINE);
    let (bounty_pda, _) = pda::bounty_address(&program_id, 1).unwrap();
    mock_account(&server, &bounty_pda, Some(account_base64(&bounty))).await;

    let client = client_for(&server, &program_id).await;
    let ix = client
        .build_cancel_bounty(1, &poster())
        .await
        .expect("build cancel");
    assert_eq!(ix.accounts.len(), 3);
}

#[tokio::test]
async fn test_build_cancel_rejected_for_non_poster() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();
    let bounty = test_bounty(1, BountyStatus::Open, FAR_DEADLINE);
    let (bounty_pda, _) = pda::bounty_address(&program_id, 1).unwrap();
    mock_account(&server, &bounty_pda, Some(account_base64(&bounty))).await;

    let client = client_for(&server, &program_id).await;
    let err = client.build_cancel_bounty(1, &claimer()).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

/// What is tested: a ledger rejection surfaces verbatim with program logs
/// Why: callers need the diagnostic log to distinguish a lost race from a bug
#[tokio::test]
async fn test_send_transaction_surfaces_ledger_rejection() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();

    Mock::given(method("POST"))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "method": "sendTransaction",
            "params": ["dGVzdA==", { "encoding": "base64" }],
            "id": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": null,
            "error": {
                "code": -32002,
                "message": "Transaction simulation failed",
                "data": { "logs": ["Program log: Error: BountyNotOpen"] }
            },
            "id": 1
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &program_id).await;
    let err = client.send_transaction("dGVzdA==").await.unwrap_err();
    match err {
        ClientError::LedgerRejected { message, logs } => {
            assert!(message.contains("simulation failed"));
            assert_eq!(logs.len(), 1);
            assert!(logs[0].contains("BountyNotOpen"));
        }
        other => panic!("expected LedgerRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_confirm_transaction_states() {
    let server = MockServer::start().await;
    let program_id = Pubkey::new_unique();

    Mock::given(method("POST"))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "method": "getSignatureStatuses",
            "params": [["sig-confirmed"]],
            "id": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": { "value": [{ "confirmationStatus": "confirmed", "err": null }] },
            "id": 1
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "method": "getSignatureStatuses",
            "params": [["sig-missing"]],
            "id": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": { "value": [null] },
            "id": 1
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &program_id).await;
    assert!(client.confirm_transaction("sig-confirmed").await.unwrap());
    assert!(!client.confirm_transaction("sig-missing").await.unwrap());
}
