//! Unit conversion and display helpers

use chrono::{DateTime, Utc};
use ethers::{
    types::U256,
    utils::{format_ether, format_units},
};

/// Converts wei to ETH as a float, for comparisons and display.
pub fn wei_to_eth(wei: U256) -> f64 {
    format_ether(wei).parse().unwrap_or(f64::MAX)
}

/// Converts wei to gwei as a float.
pub fn wei_to_gwei(wei: U256) -> f64 {
    format_units(wei, "gwei")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(f64::MAX)
}

/// Shortens a hash to `0x` plus `chars` leading and trailing characters.
pub fn shorten_hash(hash: &str, chars: usize) -> String {
    elide(hash, chars + 2, chars)
}

/// `0x1234...abcd`
pub fn shorten_address(address: &str) -> String {
    elide(address, 6, 4)
}

fn elide(value: &str, head: usize, tail: usize) -> String {
    if value.len() <= head + tail || !value.is_ascii() {
        return value.to_string();
    }
    format!("{}...{}", &value[..head], &value[value.len() - tail..])
}

/// "12 secs ago", "3 mins ago", "5 hours ago", "2 days ago"
pub fn format_time_ago(timestamp: u64, now: DateTime<Utc>) -> String {
    let seconds = (now.timestamp() - timestamp as i64).max(0);

    if seconds < 60 {
        format!("{} secs ago", seconds)
    } else if seconds < 3600 {
        format!("{} mins ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else {
        format!("{} days ago", seconds / 86400)
    }
}

/// RFC 3339 rendering of a unix timestamp.
pub fn format_timestamp(timestamp: u64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| timestamp.to_string())
}
