//! REST API Server Module
//!
//! This module provides a REST API server for the bounty service, exposing
//! read-only bounty queries and endpoints that return unsigned instructions
//! for client-side signing.
//!
//! ## Security Model
//!
//! The service holds NO private keys and CANNOT sign or submit transactions.
//! Write endpoints only describe the instruction a wallet must sign.

// Generic shared code (envelope, rejections, CORS, server)
mod generic;

// Bounty query and instruction-building endpoints
mod bounties;

// Re-export ApiServer for convenience
pub use generic::ApiServer;
// Re-export response types for testing
#[allow(unused_imports)]
pub use generic::ApiResponse;
#[allow(unused_imports)]
pub use bounties::{BountyView, CreateBountyResponse, InstructionResponse, ListBountiesResponse};
