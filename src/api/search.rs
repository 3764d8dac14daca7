use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    api::error::ApiError,
    blockchain::{models::MatchRecord, services::scanner::scan, to_checksum},
    search::{
        classify, FilterParams, SearchClassification, INVALID_QUERY_MESSAGE, SUGGESTED_SEARCHES,
    },
    utils::{shorten_address, shorten_hash, wei_to_eth},
    AppState,
};

// --- Request and Response Models ---

/// Query parameters shared by `/classify` and `/search`.
///
/// `min`, `max` and `exact` are ETH amounts; when any is present it replaces
/// whatever filter the `q` phrase would produce. Numeric parameters arrive as
/// raw strings so that empty values read as absent and malformed ones are
/// reported as `ApiError::InvalidQuery`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub exact: Option<String>,
    /// Scan window in blocks
    pub blocks: Option<String>,
    /// Maximum number of matches
    pub limit: Option<String>,
}

impl SearchQuery {
    fn explicit_filter(&self) -> Result<Option<FilterParams>, ApiError> {
        let filter = FilterParams {
            min_value: parse_param("min", self.min.as_deref())?,
            max_value: parse_param("max", self.max.as_deref())?,
            exact_value: parse_param("exact", self.exact.as_deref())?,
        };
        Ok((!filter.is_empty()).then_some(filter))
    }
}

fn parse_param<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::InvalidQuery(format!("Invalid value for {}: {}", name, value))),
    }
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub label: &'static str,
    pub query: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ClassifyOutput {
    pub query: String,
    pub classification: SearchClassification,
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub struct MatchOutput {
    pub hash: String,
    pub from: String,
    /// `None` for contract creation
    pub to: Option<String>,
    pub value_wei: String,
    pub value_eth: f64,
    pub block_number: u64,
    /// "Transaction 0x12345678...9abcdef0"
    pub title: String,
    /// One-line result text for the results page
    pub snippet: String,
}

impl From<&MatchRecord> for MatchOutput {
    fn from(record: &MatchRecord) -> Self {
        let hash = format!("{:?}", record.transaction_hash);
        let from = to_checksum(&record.from_address, None);
        let to = record.to_address.map(|to| to_checksum(&to, None));
        let value_eth = wei_to_eth(record.value_wei);
        let snippet = format!(
            "Transfer of {:.4} ETH from {} to {}. Block #{}.",
            value_eth,
            shorten_address(&from),
            to.as_deref()
                .map(shorten_address)
                .unwrap_or_else(|| "Contract Creation".to_string()),
            record.block_number
        );
        Self {
            title: format!("Transaction {}", shorten_hash(&hash, 8)),
            snippet,
            hash,
            from,
            to,
            value_wei: record.value_wei.to_string(),
            value_eth,
            block_number: record.block_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanOutput {
    pub filter: FilterParams,
    /// e.g. "Found 2 transactions over 10 ETH in the last 5 blocks"
    pub description: String,
    pub chain_head: u64,
    pub window_blocks: u64,
    pub blocks_scanned: u64,
    pub result_cap: usize,
    pub matches: Vec<MatchOutput>,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub classification: SearchClassification,
    pub destination: Option<String>,
    /// Present only for value-filter searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanOutput>,
}

// --- Handlers ---

/// Handler for GET /classify?q=
///
/// Resolves where the search bar should send the user. Never touches the chain.
pub async fn classify_handler(
    Query(query): Query<SearchQuery>,
) -> Result<Json<ClassifyOutput>, ApiError> {
    let input = query.q.unwrap_or_default();

    if input.trim().is_empty() {
        return Ok(Json(ClassifyOutput {
            query: input,
            classification: SearchClassification::Unrecognized,
            destination: None,
            suggestions: SUGGESTED_SEARCHES
                .iter()
                .map(|&(label, query)| Suggestion { label, query })
                .collect(),
        }));
    }

    let classification = classify(&input);
    debug!("Classified '{}' as {:?}", input, classification);

    if classification == SearchClassification::Unrecognized {
        return Err(ApiError::InvalidQuery(INVALID_QUERY_MESSAGE.to_string()));
    }

    Ok(Json(ClassifyOutput {
        destination: classification.destination(&input),
        query: input,
        classification,
        suggestions: Vec::new(),
    }))
}

/// Handler for GET /search
///
/// Value filters (from `min`/`max`/`exact` or a phrase in `q`) run the range
/// scanner over recent blocks. Other recognised queries return their
/// destination without a scan.
pub async fn search_handler(
    Query(query): Query<SearchQuery>,
    State(state): State<AppState>,
) -> Result<Json<SearchOutput>, ApiError> {
    let input = query.q.clone().unwrap_or_default();

    let classification = match query.explicit_filter()? {
        Some(filter) => SearchClassification::ValueFilter(filter),
        None => classify(&input),
    };
    debug!("Search '{}' classified as {:?}", input, classification);

    let filter = match classification {
        SearchClassification::ValueFilter(filter) => filter,
        SearchClassification::Unrecognized => {
            return Err(ApiError::InvalidQuery(INVALID_QUERY_MESSAGE.to_string()));
        }
        other => {
            return Ok(Json(SearchOutput {
                destination: other.destination(&input),
                query: input,
                classification: other,
                scan: None,
            }));
        }
    };
    let classification = SearchClassification::ValueFilter(filter);

    let window = state
        .config
        .scan_window(parse_param("blocks", query.blocks.as_deref())?);
    let cap = state
        .config
        .result_cap(parse_param("limit", query.limit.as_deref())?);
    info!(
        "Scanning {} blocks for up to {} transactions {}",
        window,
        cap,
        filter.describe()
    );

    let result = scan(state.chain.as_ref(), &filter, window, cap)
        .await
        .map_err(|e| {
            error!("Scan for '{}' failed: {}", input, e);
            ApiError::from(e)
        })?;

    let description = format!(
        "Found {} transactions {} in the last {} blocks",
        result.matches.len(),
        filter.describe(),
        window
    );

    Ok(Json(SearchOutput {
        destination: classification.destination(&input),
        query: input,
        classification,
        scan: Some(ScanOutput {
            filter,
            description,
            chain_head: result.chain_head,
            window_blocks: window,
            blocks_scanned: result.blocks_scanned,
            result_cap: cap,
            matches: result.matches.iter().map(MatchOutput::from).collect(),
        }),
    }))
}
