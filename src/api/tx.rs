use axum::{
    extract::{Path, State},
    Json,
};
use ethers::{types::H256, utils::to_checksum};
use serde::Serialize;
use tracing::{error, info};

use crate::{
    api::error::ApiError,
    blockchain::{
        models::ChainTransaction,
        services::transactions::{latest_transactions, transaction_details},
    },
    search::{classify, SearchClassification},
    utils::{wei_to_eth, wei_to_gwei},
    AppState,
};

/// Input data longer than this is truncated in responses.
const INPUT_PREVIEW_CHARS: usize = 200;

// --- Response Models ---

/// A transaction as listed on block and listing pages.
#[derive(Debug, Serialize)]
pub struct TransactionSummary {
    pub hash: String,
    pub from: String,
    /// `None` for contract creation
    pub to: Option<String>,
    pub value_wei: String,
    pub value_eth: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl From<&ChainTransaction> for TransactionSummary {
    fn from(tx: &ChainTransaction) -> Self {
        Self {
            hash: format!("{:?}", tx.hash),
            from: to_checksum(&tx.from, None),
            to: tx.to.map(|to| to_checksum(&to, None)),
            value_wei: tx.value.to_string(),
            value_eth: wei_to_eth(tx.value),
            block_number: tx.block_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionOutput {
    #[serde(flatten)]
    pub summary: TransactionSummary,
    /// "success", "failed" or "pending"
    pub status: &'static str,
    pub nonce: String,
    pub gas_limit: String,
    pub gas_used: Option<String>,
    pub gas_price_gwei: Option<f64>,
    pub fee_eth: Option<f64>,
    /// Hex call data, truncated; `None` for plain transfers
    pub input_preview: Option<String>,
    pub input_truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct LatestTransactionsOutput {
    pub block_number: u64,
    pub transactions: Vec<TransactionSummary>,
}

fn parse_hash(hash: &str) -> Option<H256> {
    match classify(hash) {
        SearchClassification::Transaction(hash) => hash.parse::<H256>().ok(),
        _ => None,
    }
}

// --- Handlers ---

/// Handler for GET /tx/:hash
pub async fn get_transaction_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TransactionOutput>, ApiError> {
    info!("Received request for transaction {}", hash);

    let not_found = || ApiError::NotFound(format!("Transaction {} not found", hash));
    let tx_hash = parse_hash(&hash).ok_or_else(not_found)?;

    let details = transaction_details(state.chain.as_ref(), tx_hash)
        .await
        .map_err(|e| {
            error!("Failed to fetch transaction {}: {}", hash, e);
            ApiError::from(e)
        })?
        .ok_or_else(not_found)?;

    let tx = &details.transaction;
    let receipt = details.receipt.as_ref();

    let status = match receipt {
        Some(r) if r.success => "success",
        Some(_) => "failed",
        None => "pending",
    };
    let fee_eth = receipt.and_then(|r| match (r.gas_used, r.effective_gas_price) {
        (Some(used), Some(price)) => Some(wei_to_eth(used.saturating_mul(price))),
        _ => None,
    });

    let input_hex = format!("0x{}", hex::encode(&tx.input));
    let (input_preview, input_truncated) = if tx.input.is_empty() {
        (None, false)
    } else if input_hex.len() > INPUT_PREVIEW_CHARS {
        (Some(input_hex[..INPUT_PREVIEW_CHARS].to_string()), true)
    } else {
        (Some(input_hex), false)
    };

    Ok(Json(TransactionOutput {
        summary: TransactionSummary::from(tx),
        status,
        nonce: tx.nonce.to_string(),
        gas_limit: tx.gas.to_string(),
        gas_used: receipt.and_then(|r| r.gas_used).map(|g| g.to_string()),
        gas_price_gwei: tx.gas_price.map(wei_to_gwei),
        fee_eth,
        input_preview,
        input_truncated,
    }))
}

/// Handler for GET /transactions
pub async fn get_latest_transactions_handler(
    State(state): State<AppState>,
) -> Result<Json<LatestTransactionsOutput>, ApiError> {
    let count = state.config.latest_transactions_count;
    let (block_number, transactions) = latest_transactions(state.chain.as_ref(), count)
        .await
        .map_err(|e| {
            error!("Failed to fetch latest transactions: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(LatestTransactionsOutput {
        block_number,
        transactions: transactions.iter().map(TransactionSummary::from).collect(),
    }))
}
