//! Search bar query handling: classification and value filters.

pub mod classifier;
pub mod filter;

pub use classifier::{classify, BlockRef, Keyword, SearchClassification, INVALID_QUERY_MESSAGE};
pub use filter::{FilterParams, EXACT_MATCH_TOLERANCE_ETH};

/// Searches offered on an empty search bar, as (label, query).
pub const SUGGESTED_SEARCHES: &[(&str, &str)] = &[
    ("Large transactions", "transactions over 10 eth"),
    ("Whale moves", "transactions over 100 eth"),
    ("vitalik.eth", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
    ("Latest blocks", "blocks"),
    ("Rich list", "addresses"),
];
