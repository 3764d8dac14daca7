use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use ethers::utils::to_checksum;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    api::{error::ApiError, tx::TransactionSummary},
    blockchain::{models::ChainBlock, services::blocks::latest_blocks},
    search::BlockRef,
    utils::{format_time_ago, format_timestamp, wei_to_gwei},
    AppState,
};

/// How many of a block's transactions the block page lists.
const BLOCK_PAGE_TRANSACTIONS: usize = 10;

// --- Response Models ---

#[derive(Debug, Serialize)]
pub struct BlockSummary {
    pub number: u64,
    pub hash: Option<String>,
    pub timestamp: u64,
    pub time: String,
    pub age: String,
    /// Fee recipient
    pub miner: Option<String>,
    pub transaction_count: usize,
    pub gas_used: String,
    pub gas_limit: String,
    pub gas_used_percent: f64,
    pub base_fee_gwei: Option<f64>,
}

impl From<&ChainBlock> for BlockSummary {
    fn from(block: &ChainBlock) -> Self {
        let gas_used_percent = if block.gas_limit.is_zero() {
            0.0
        } else {
            block.gas_used.low_u128() as f64 / block.gas_limit.low_u128() as f64 * 100.0
        };
        Self {
            number: block.number,
            hash: block.hash.map(|h| format!("{:?}", h)),
            timestamp: block.timestamp,
            time: format_timestamp(block.timestamp),
            age: format_time_ago(block.timestamp, Utc::now()),
            miner: block.miner.map(|m| to_checksum(&m, None)),
            transaction_count: block.transaction_count,
            gas_used: block.gas_used.to_string(),
            gas_limit: block.gas_limit.to_string(),
            gas_used_percent,
            base_fee_gwei: block.base_fee_per_gas.map(wei_to_gwei),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlockOutput {
    #[serde(flatten)]
    pub block: BlockSummary,
    /// The first transactions of the block
    pub transactions: Vec<TransactionSummary>,
}

#[derive(Debug, Serialize)]
pub struct LatestBlocksOutput {
    pub blocks: Vec<BlockSummary>,
}

// --- Handlers ---

/// Handler for GET /block/:number
pub async fn get_block_handler(
    Path(number): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<BlockOutput>, ApiError> {
    info!("Received request for block {}", number);

    let not_found = || ApiError::NotFound(format!("Block {} not found", number));
    let height = BlockRef::parse(&number)
        .and_then(|block| block.number())
        .ok_or_else(not_found)?;

    let block = state
        .chain
        .get_block(height, true)
        .await
        .map_err(|e| {
            error!("Failed to fetch block {}: {}", height, e);
            ApiError::from(e)
        })?
        .ok_or_else(not_found)?;

    Ok(Json(BlockOutput {
        block: BlockSummary::from(&block),
        transactions: block
            .transactions
            .iter()
            .take(BLOCK_PAGE_TRANSACTIONS)
            .map(TransactionSummary::from)
            .collect(),
    }))
}

/// Handler for GET /blocks
pub async fn get_latest_blocks_handler(
    State(state): State<AppState>,
) -> Result<Json<LatestBlocksOutput>, ApiError> {
    let blocks = latest_blocks(state.chain.as_ref(), state.config.latest_blocks_count)
        .await
        .map_err(|e| {
            error!("Failed to fetch latest blocks: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(LatestBlocksOutput {
        blocks: blocks.iter().map(BlockSummary::from).collect(),
    }))
}
