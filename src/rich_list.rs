//! Known large ETH holders.
//!
//! A static lookup table, compiled in from `data/rich_list.json` or loaded
//! from a file named by configuration. Never refreshed from the chain.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const BUILTIN_RICH_LIST: &str = include_str!("../data/rich_list.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichListEntry {
    pub address: String,
    pub name: String,
    /// Approximate balance in whole ETH, as published
    pub balance_eth: String,
}

/// Rich list in rank order.
#[derive(Debug, Clone, Default)]
pub struct RichList {
    entries: Vec<RichListEntry>,
}

impl RichList {
    pub fn from_entries(entries: Vec<RichListEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<RichListEntry> =
            serde_json::from_str(json).context("Invalid rich list JSON")?;
        Ok(Self::from_entries(entries))
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_RICH_LIST)
    }

    /// Loads the list from `path`, or the built-in list when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read rich list {}", path.display()))?;
                Self::from_json(&json)
            }
            None => Self::builtin(),
        }
    }

    pub fn entries(&self) -> &[RichListEntry] {
        &self.entries
    }

    /// Finds an entry by address, ignoring checksum casing.
    pub fn lookup(&self, address: &str) -> Option<&RichListEntry> {
        self.entries
            .iter()
            .find(|entry| entry.address.eq_ignore_ascii_case(address))
    }
}
