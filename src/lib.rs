// src/lib.rs

use std::sync::Arc;

// Re-export commonly used types
pub use ethers::types::{Address, H256, U256};

pub mod api;
pub mod blockchain;
pub mod config;
pub mod rich_list;
pub mod search;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Read-only chain data source
    pub chain: Arc<dyn blockchain::ChainReader>,
    /// Static rich list served by `/addresses`
    pub rich_list: Arc<rich_list::RichList>,
}
