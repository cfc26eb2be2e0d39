//! Generic API structures and handlers
//!
//! This module contains the shared response envelope, rejection handling,
//! CORS configuration, and the API server itself. Endpoint handlers live in
//! the `bounties` module.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use warp::{
    http::{Method, StatusCode},
    Filter, Rejection, Reply,
};

use bounty_client::{BountyClient, ClientError};

use crate::config::Config;

use super::bounties;

// ============================================================================
// SHARED REQUEST/RESPONSE STRUCTURES
// ============================================================================

/// Standardized response structure for all API endpoints.
///
/// This structure provides a consistent response format for all API
/// endpoints, including success/error status and relevant data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    pub data: Option<T>,
    /// Error message (if failed)
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

// ============================================================================
// CUSTOM REJECTION TYPES
// ============================================================================

/// Rejection carrying a client-layer failure and its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl warp::reject::Reject for ApiError {}

/// Maps a client error onto the HTTP status contract:
/// 400 validation failure, 404 bounty not found, 500 ledger/unexpected.
pub fn reject_client_error(err: ClientError) -> Rejection {
    let status = match &err {
        ClientError::Validation(_)
        | ClientError::Encoding(_)
        | ClientError::InvalidStateTransition { .. }
        | ClientError::DeadlinePassed { .. } => StatusCode::BAD_REQUEST,
        ClientError::AccountNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warp::reject::custom(ApiError {
        status,
        message: err.to_string(),
    })
}

// ============================================================================
// WARP FILTER HELPERS
// ============================================================================

/// Creates a warp filter that injects the bounty client into handlers.
pub fn with_client(
    client: Arc<BountyClient>,
) -> impl Filter<Extract = (Arc<BountyClient>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || client.clone())
}

// ============================================================================
// CORS CONFIGURATION
// ============================================================================

/// Creates a CORS filter based on the configured allowed origins.
fn create_cors_filter(allowed_origins: &[String]) -> warp::cors::Builder {
    let methods = vec![Method::GET, Method::POST, Method::OPTIONS];

    if allowed_origins.contains(&"*".to_string()) {
        warp::cors()
            .allow_any_origin()
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    } else {
        let origins: Vec<&str> = allowed_origins.iter().map(|s| s.as_str()).collect();
        warp::cors()
            .allow_origins(origins)
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    }
}

// ============================================================================
// REJECTION HANDLER
// ============================================================================

/// Global rejection handler for all API routes.
///
/// This function handles all warp rejections and converts them into
/// standardized API responses with appropriate HTTP status codes.
pub async fn handle_rejection(rej: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, message) = if let Some(err) = rej.find::<ApiError>() {
        (err.status, err.message.clone())
    } else if let Some(err) = rej.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", err))
    } else if rej.is_not_found() {
        (StatusCode::NOT_FOUND, "Endpoint not found".to_string())
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else {
        error!("Unhandled rejection: {:?}", rej);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        }),
        status,
    ))
}

// ============================================================================
// API SERVER IMPLEMENTATION
// ============================================================================

/// REST API server for the bounty service.
///
/// This server exposes HTTP endpoints for reading protocol and bounty state
/// and for building unsigned instructions. All blockchain access goes
/// through the shared `BountyClient`.
pub struct ApiServer {
    /// Service configuration
    config: Arc<Config>,
    /// Bounty client for all ledger access
    client: Arc<BountyClient>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration and client.
    pub fn new(config: Config, client: BountyClient) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
        }
    }

    /// Starts the API server and begins handling HTTP requests.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Server ran to completion
    /// * `Err(anyhow::Error)` - Failed to bind the configured address
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting API server on {}:{}",
            self.config.api.host, self.config.api.port
        );

        let routes = self.create_routes();

        let addr: std::net::SocketAddr =
            format!("{}:{}", self.config.api.host, self.config.api.port)
                .parse()
                .context("Failed to parse API server address")?;

        warp::serve(routes).run(addr).await;

        Ok(())
    }

    /// Creates all API routes for the server.
    ///
    /// # Returns
    ///
    /// A warp filter containing all API routes
    pub(crate) fn create_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        let client = self.client.clone();

        // Health check endpoint - returns service status
        let health = warp::path("health").and(warp::get()).map(|| {
            warp::reply::json(&ApiResponse::<String>::ok(
                "Bounty Service is running".to_string(),
            ))
        });

        // GET /stats - protocol counters
        let stats = warp::path("stats")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_client(client.clone()))
            .and_then(bounties::get_stats_handler);

        // GET /bounties - list bounties with optional status/limit/offset
        let list = warp::path("bounties")
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::query::<bounties::ListQuery>())
            .and(with_client(client.clone()))
            .and_then(bounties::list_bounties_handler);

        // GET /bounties/:id - one bounty
        let get_one = warp::path("bounties")
            .and(warp::path::param::<u64>())
            .and(warp::path::end())
            .and(warp::get())
            .and(with_client(client.clone()))
            .and_then(bounties::get_bounty_handler);

        // POST /bounties - unsigned create instruction
        let create = warp::path("bounties")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_client(client.clone()))
            .and_then(bounties::create_bounty_handler);

        // POST /bounties/:id/claim - unsigned claim instruction
        let claim = warp::path("bounties")
            .and(warp::path::param::<u64>())
            .and(warp::path("claim"))
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_client(client.clone()))
            .and_then(bounties::claim_bounty_handler);

        // POST /bounties/:id/submit - unsigned submit instruction
        let submit = warp::path("bounties")
            .and(warp::path::param::<u64>())
            .and(warp::path("submit"))
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_client(client.clone()))
            .and_then(bounties::submit_work_handler);

        // POST /bounties/:id/approve - unsigned approve instruction
        let approve = warp::path("bounties")
            .and(warp::path::param::<u64>())
            .and(warp::path("approve"))
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_client(client.clone()))
            .and_then(bounties::approve_work_handler);

        // POST /bounties/:id/cancel - unsigned cancel instruction
        let cancel = warp::path("bounties")
            .and(warp::path::param::<u64>())
            .and(warp::path("cancel"))
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_client(client.clone()))
            .and_then(bounties::cancel_bounty_handler);

        health
            .or(stats)
            .or(list)
            .or(get_one)
            .or(create)
            .or(claim)
            .or(submit)
            .or(approve)
            .or(cancel)
            .with(create_cors_filter(&self.config.api.cors_origins))
            .recover(handle_rejection)
    }

    /// Public method for testing - exposes routes for integration tests
    #[allow(dead_code)] // Used by tests
    pub fn test_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        self.create_routes()
    }
}
