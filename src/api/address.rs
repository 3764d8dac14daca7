use axum::{
    extract::{Path, State},
    Json,
};
use ethers::types::Address;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    api::error::ApiError,
    blockchain::{services::address::address_details, to_checksum},
    rich_list::RichListEntry,
    search::{classify, SearchClassification},
    utils::wei_to_eth,
    AppState,
};

// --- Response Models ---

#[derive(Debug, Serialize)]
pub struct AddressOutput {
    pub address: String,
    pub balance_wei: String,
    pub balance_eth: f64,
    /// Nonce: transactions sent from this address
    pub transaction_count: String,
    pub is_contract: bool,
    /// Name from the rich list, when the address is on it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedAddress {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: RichListEntry,
}

#[derive(Debug, Serialize)]
pub struct RichListOutput {
    pub addresses: Vec<RankedAddress>,
}

// --- Handlers ---

/// Handler for GET /address/:address
pub async fn get_address_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AddressOutput>, ApiError> {
    info!("Received request for address {}", address);

    let parsed = match classify(&address) {
        SearchClassification::Address(hex) => hex.parse::<Address>().ok(),
        _ => None,
    }
    .ok_or_else(|| ApiError::NotFound(format!("Address {} not found", address)))?;

    let details = address_details(state.chain.as_ref(), parsed)
        .await
        .map_err(|e| {
            error!("Failed to fetch address {}: {}", address, e);
            ApiError::from(e)
        })?;

    let checksummed = to_checksum(&parsed, None);
    Ok(Json(AddressOutput {
        label: state.rich_list.lookup(&checksummed).map(|e| e.name.clone()),
        address: checksummed,
        balance_wei: details.account.balance.to_string(),
        balance_eth: wei_to_eth(details.account.balance),
        transaction_count: details.account.transaction_count.to_string(),
        is_contract: details.is_contract,
    }))
}

/// Handler for GET /addresses
pub async fn get_rich_list_handler(State(state): State<AppState>) -> Json<RichListOutput> {
    Json(RichListOutput {
        addresses: state
            .rich_list
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| RankedAddress {
                rank: i + 1,
                entry: entry.clone(),
            })
            .collect(),
    })
}
