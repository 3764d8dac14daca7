//! Search bar input classification.
//!
//! `classify` turns a raw query into a [`SearchClassification`]. Rules are
//! tried in a fixed order and the first hit wins:
//!
//! 1. keywords (`blocks`, `txs`, `wallets`, ...)
//! 2. value-filter phrases (`transactions over 10 eth`, `whale moves`, ...)
//! 3. structural identifiers (block number, tx hash, address)

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::filter::FilterParams;

/// Message shown when nothing matches.
pub const INVALID_QUERY_MESSAGE: &str = "Enter a valid block number, transaction hash, or address";

/// Listing pages reachable by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Transactions,
    Blocks,
    Addresses,
}

impl Keyword {
    fn from_input(lowered: &str) -> Option<Self> {
        match lowered {
            "transactions" | "txs" | "tx" => Some(Keyword::Transactions),
            "blocks" | "block" => Some(Keyword::Blocks),
            "addresses" | "address" | "addys" | "wallets" => Some(Keyword::Addresses),
            _ => None,
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            Keyword::Transactions => "/transactions",
            Keyword::Blocks => "/blocks",
            Keyword::Addresses => "/addresses",
        }
    }
}

/// A block number exactly as typed: ASCII digits of any length.
///
/// Range checking happens where the number is used, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockRef(String);

impl BlockRef {
    pub fn parse(input: &str) -> Option<Self> {
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(input.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The block height, or `None` when it cannot be a real chain height.
    pub fn number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SearchClassification {
    Block(BlockRef),
    Transaction(String),
    Address(String),
    Keyword(Keyword),
    ValueFilter(FilterParams),
    Unrecognized,
}

impl SearchClassification {
    /// Route the search bar navigates to for this classification.
    ///
    /// `query` is the raw input; value filters carry it along as `q`.
    pub fn destination(&self, query: &str) -> Option<String> {
        match self {
            SearchClassification::Block(block) => Some(format!("/block/{}", block.as_str())),
            SearchClassification::Transaction(hash) => Some(format!("/tx/{}", hash)),
            SearchClassification::Address(address) => Some(format!("/address/{}", address)),
            SearchClassification::Keyword(keyword) => Some(keyword.route().to_string()),
            SearchClassification::ValueFilter(filter) => {
                let mut params = form_urlencoded::Serializer::new(String::new());
                params.append_pair("q", query);
                for (key, value) in filter.query_pairs() {
                    params.append_pair(key, &value);
                }
                Some(format!("/search?{}", params.finish()))
            }
            SearchClassification::Unrecognized => None,
        }
    }
}

lazy_static! {
    static ref OVER_PATTERN: Regex =
        Regex::new(r"(?:transactions?|txs?)\s+(?:over|above|greater than|>)\s+([0-9]+(?:\.[0-9]+)?)\s*(?:eth)?")
            .unwrap();
    static ref UNDER_PATTERN: Regex =
        Regex::new(r"(?:transactions?|txs?)\s+(?:under|below|less than|<)\s+([0-9]+(?:\.[0-9]+)?)\s*(?:eth)?")
            .unwrap();
    static ref EXACT_PATTERN: Regex =
        Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*(?:eth)?\s+(?:transactions?|txs?)").unwrap();
}

type PhraseRule = fn(&str) -> Option<FilterParams>;

/// Value-filter phrase rules, evaluated top to bottom against lowered input.
const PHRASE_RULES: &[PhraseRule] = &[over_rule, under_rule, exact_rule, large_rule, whale_rule];

fn over_rule(q: &str) -> Option<FilterParams> {
    capture_amount(&OVER_PATTERN, q).map(FilterParams::min)
}

fn under_rule(q: &str) -> Option<FilterParams> {
    capture_amount(&UNDER_PATTERN, q).map(FilterParams::max)
}

fn exact_rule(q: &str) -> Option<FilterParams> {
    capture_amount(&EXACT_PATTERN, q).map(FilterParams::exact)
}

fn large_rule(q: &str) -> Option<FilterParams> {
    (q.contains("large") && (q.contains("transaction") || q.contains("tx")))
        .then(|| FilterParams::min(10.0))
}

fn whale_rule(q: &str) -> Option<FilterParams> {
    let mentions_transfer = q.contains("transaction") || q.contains("tx") || q.contains("move");
    (q.contains("whale") && mentions_transfer).then(|| FilterParams::min(100.0))
}

fn capture_amount(pattern: &Regex, input: &str) -> Option<f64> {
    pattern
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|amount| amount.as_str().parse().ok())
}

/// Parses a natural-language value filter such as "txs under 0.5 eth".
pub fn parse_value_filter(input: &str) -> Option<FilterParams> {
    let lowered = input.trim().to_lowercase();
    PHRASE_RULES.iter().find_map(|rule| rule(&lowered))
}

fn is_prefixed_hex(input: &str, digits: usize) -> bool {
    input.len() == digits + 2
        && input.starts_with("0x")
        && input[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Classifies a search bar query. Pure and infallible.
pub fn classify(input: &str) -> SearchClassification {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();

    if let Some(keyword) = Keyword::from_input(&lowered) {
        return SearchClassification::Keyword(keyword);
    }

    if let Some(filter) = parse_value_filter(&lowered) {
        return SearchClassification::ValueFilter(filter);
    }

    if let Some(block) = BlockRef::parse(trimmed) {
        return SearchClassification::Block(block);
    }
    if is_prefixed_hex(trimmed, 64) {
        return SearchClassification::Transaction(trimmed.to_string());
    }
    if is_prefixed_hex(trimmed, 40) {
        return SearchClassification::Address(trimmed.to_string());
    }

    SearchClassification::Unrecognized
}
