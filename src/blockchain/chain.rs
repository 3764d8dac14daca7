//! Read-only access to chain data.

use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256};

use crate::blockchain::models::{AccountInfo, ChainBlock, ChainError, ChainReceipt, ChainTransaction};

/// The chain-data source every lookup and scan goes through.
///
/// Implementations return `Ok(None)` for data that does not exist and
/// `Err` only when the upstream call itself failed.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Number of the latest block.
    async fn current_height(&self) -> Result<u64, ChainError>;

    /// Fetches a block. Transactions are populated only when
    /// `include_transactions` is set.
    async fn get_block(
        &self,
        number: u64,
        include_transactions: bool,
    ) -> Result<Option<ChainBlock>, ChainError>;

    async fn get_transaction(&self, hash: H256) -> Result<Option<ChainTransaction>, ChainError>;

    async fn get_transaction_receipt(&self, hash: H256)
        -> Result<Option<ChainReceipt>, ChainError>;

    async fn get_account_info(&self, address: Address) -> Result<AccountInfo, ChainError>;

    /// Deployed bytecode; empty for externally owned accounts.
    async fn get_code(&self, address: Address) -> Result<Bytes, ChainError>;
}
