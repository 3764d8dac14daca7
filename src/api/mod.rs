//! # API Module
//!
//! HTTP handlers backing the search UI. Every route is mounted under `/api`
//! and answers with JSON.
//!
//! ## Available Endpoints
//!
//! ### Search
//! - `GET /classify?q=` - Resolve a search bar query to its destination
//! - `GET /search?q=&min=&max=&exact=&blocks=&limit=` - Value-filter search over recent blocks
//!
//! ### Chain Data
//! - `GET /block/:number` - Block summary with its first transactions
//! - `GET /blocks` - Latest blocks
//! - `GET /tx/:hash` - Transaction with receipt
//! - `GET /transactions` - Transactions of the latest block
//! - `GET /address/:address` - Balance, nonce and account type
//! - `GET /addresses` - Rich list
//!
//! ### Misc
//! - `GET /health` - Liveness check

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod address;
pub mod block;
pub mod error;
pub mod health;
pub mod search;
pub mod tx;

pub use error::ApiError;

/// Builds the application router with all API routes nested under `/api`.
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        // Health check
        .route("/health", get(health::health_handler))
        // Search
        .route("/classify", get(search::classify_handler))
        .route("/search", get(search::search_handler))
        // Chain data
        .route("/block/:number", get(block::get_block_handler))
        .route("/blocks", get(block::get_latest_blocks_handler))
        .route("/tx/:hash", get(tx::get_transaction_handler))
        .route("/transactions", get(tx::get_latest_transactions_handler))
        .route("/address/:address", get(address::get_address_handler))
        .route("/addresses", get(address::get_rich_list_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
