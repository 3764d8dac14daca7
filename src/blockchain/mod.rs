// src/blockchain/mod.rs

pub mod chain;
pub mod evm_client;
pub mod models;
pub mod services;

pub use chain::ChainReader;
pub use evm_client::EvmClient;

// Re-export commonly used types
pub use ethers::{
    types::{Address, H256, U256},
    utils::to_checksum,
};
