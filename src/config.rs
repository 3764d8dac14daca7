// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_RPC_URL: &str = "https://eth.llamarpc.com";

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,
    pub bind_address: String,

    /// Ethereum Mainnet JSON-RPC endpoint
    pub rpc_url: String,
    /// Upper bound on every upstream RPC call
    pub rpc_timeout_secs: u64,

    // Range scanner settings
    pub scan_window_blocks: u64,
    pub scan_result_cap: usize,
    pub max_scan_window_blocks: u64,
    pub max_scan_result_cap: usize,

    // Listing sizes
    pub latest_blocks_count: u64,
    pub latest_transactions_count: usize,

    /// Optional JSON file replacing the built-in rich list
    pub rich_list_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_timeout_secs: 10,
            scan_window_blocks: 5,
            scan_result_cap: 20,
            max_scan_window_blocks: 50,
            max_scan_result_cap: 100,
            latest_blocks_count: 20,
            latest_transactions_count: 20,
            rich_list_path: None,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .ok()
            .with_context(|| format!("{} must be a valid number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        Ok(Config {
            // Server settings
            port: parse_var("PORT", defaults.port)?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),

            // Blockchain settings
            rpc_url: env::var("ETH_RPC_URL").unwrap_or(defaults.rpc_url),
            rpc_timeout_secs: parse_var("RPC_TIMEOUT_SECS", defaults.rpc_timeout_secs)?,

            // Scanner settings
            scan_window_blocks: parse_var("SCAN_WINDOW_BLOCKS", defaults.scan_window_blocks)?,
            scan_result_cap: parse_var("SCAN_RESULT_CAP", defaults.scan_result_cap)?,
            max_scan_window_blocks: parse_var(
                "MAX_SCAN_WINDOW_BLOCKS",
                defaults.max_scan_window_blocks,
            )?,
            max_scan_result_cap: parse_var("MAX_SCAN_RESULT_CAP", defaults.max_scan_result_cap)?,

            // Listings
            latest_blocks_count: parse_var("LATEST_BLOCKS_COUNT", defaults.latest_blocks_count)?,
            latest_transactions_count: parse_var(
                "LATEST_TRANSACTIONS_COUNT",
                defaults.latest_transactions_count,
            )?,

            rich_list_path: env::var("RICH_LIST_PATH").ok(),
        })
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    /// Scan window for a request, defaulted and clamped to the configured maximum.
    pub fn scan_window(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.scan_window_blocks)
            .min(self.max_scan_window_blocks)
    }

    /// Result cap for a request, defaulted and clamped to the configured maximum.
    pub fn result_cap(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.scan_result_cap)
            .min(self.max_scan_result_cap)
    }
}
