// src/blockchain/models.rs
use ethers::types::{
    Address, Block, Bytes, Transaction as EthTransaction, TransactionReceipt, H256, U256,
};
use serde::Serialize;
use thiserror::Error;

// --- Error types for chain reads ---

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("{operation} failed: {message}")]
    Upstream {
        operation: &'static str,
        message: String,
    },
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },
}

// --- Chain Models ---

/// A transaction as returned by the chain (our internal representation).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainTransaction {
    pub hash: H256,
    pub from: Address,
    /// `None` for contract creation
    pub to: Option<Address>,
    /// Value in wei
    pub value: U256,
    pub block_number: Option<u64>,
    pub nonce: U256,
    pub gas: U256,
    pub gas_price: Option<U256>,
    pub input: Bytes,
}

impl From<EthTransaction> for ChainTransaction {
    fn from(tx: EthTransaction) -> Self {
        Self {
            hash: tx.hash,
            from: tx.from,
            to: tx.to,
            value: tx.value,
            block_number: tx.block_number.map(|n| n.as_u64()),
            nonce: tx.nonce,
            gas: tx.gas,
            gas_price: tx.gas_price,
            input: tx.input,
        }
    }
}

/// A block header, optionally with its full transaction list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainBlock {
    pub number: u64,
    pub hash: Option<H256>,
    /// Unix seconds
    pub timestamp: u64,
    /// Fee recipient
    pub miner: Option<Address>,
    pub gas_used: U256,
    pub gas_limit: U256,
    pub base_fee_per_gas: Option<U256>,
    pub transaction_count: usize,
    /// Empty unless the block was fetched with transactions
    pub transactions: Vec<ChainTransaction>,
}

impl ChainBlock {
    fn header<T>(block: &Block<T>, number: u64) -> Self {
        Self {
            number: block.number.map(|n| n.as_u64()).unwrap_or(number),
            hash: block.hash,
            timestamp: block.timestamp.low_u64(),
            miner: block.author,
            gas_used: block.gas_used,
            gas_limit: block.gas_limit,
            base_fee_per_gas: block.base_fee_per_gas,
            transaction_count: block.transactions.len(),
            transactions: Vec::new(),
        }
    }

    pub fn from_hashes(block: Block<H256>, number: u64) -> Self {
        Self::header(&block, number)
    }

    pub fn from_full(block: Block<EthTransaction>, number: u64) -> Self {
        let mut summary = Self::header(&block, number);
        summary.transactions = block.transactions.into_iter().map(Into::into).collect();
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainReceipt {
    pub success: bool,
    pub gas_used: Option<U256>,
    pub effective_gas_price: Option<U256>,
}

impl From<TransactionReceipt> for ChainReceipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            success: receipt.status.map(|s| s.as_u64() == 1).unwrap_or(false),
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
        }
    }
}

/// Balance and nonce of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccountInfo {
    /// Balance in wei
    pub balance: U256,
    pub transaction_count: U256,
}

// --- Scan Models ---

/// A transaction that passed a value filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub transaction_hash: H256,
    pub from_address: Address,
    /// `None` signals contract creation
    pub to_address: Option<Address>,
    pub value_wei: U256,
    pub block_number: u64,
}

/// Matches ordered newest block first, then by position within the block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanResult {
    pub chain_head: u64,
    pub blocks_scanned: u64,
    pub matches: Vec<MatchRecord>,
}
