//! Value filters applied to transactions by the range scanner.

use serde::{Deserialize, Serialize};

/// Absolute tolerance, in ETH, for `exact_value` matches.
///
/// Absorbs the rounding introduced by the wei -> ETH conversion. This is a
/// fixed distance, not a percentage of the requested value.
pub const EXACT_MATCH_TOLERANCE_ETH: f64 = 0.01;

/// ETH-denominated bounds for a transaction value search.
///
/// `exact_value` takes precedence over `min_value`/`max_value`. The range
/// bounds are inclusive and either may be open. Negative bounds are accepted
/// as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_value: Option<f64>,
}

impl FilterParams {
    pub fn min(value: f64) -> Self {
        Self {
            min_value: Some(value),
            ..Self::default()
        }
    }

    pub fn max(value: f64) -> Self {
        Self {
            max_value: Some(value),
            ..Self::default()
        }
    }

    pub fn exact(value: f64) -> Self {
        Self {
            exact_value: Some(value),
            ..Self::default()
        }
    }

    /// True when no bound is set. Such a filter matches nothing.
    pub fn is_empty(&self) -> bool {
        self.min_value.is_none() && self.max_value.is_none() && self.exact_value.is_none()
    }

    /// Tests a transaction value, already converted to ETH.
    pub fn matches(&self, value_eth: f64) -> bool {
        if let Some(exact) = self.exact_value {
            return (value_eth - exact).abs() < EXACT_MATCH_TOLERANCE_ETH;
        }
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => value_eth >= min && value_eth <= max,
            (Some(min), None) => value_eth >= min,
            (None, Some(max)) => value_eth <= max,
            (None, None) => false,
        }
    }

    /// Human readable summary, e.g. "over 10 ETH".
    pub fn describe(&self) -> String {
        if let Some(exact) = self.exact_value {
            return format!("exactly {} ETH", exact);
        }
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => format!("between {} and {} ETH", min, max),
            (Some(min), None) => format!("over {} ETH", min),
            (None, Some(max)) => format!("under {} ETH", max),
            (None, None) => "matching your criteria".to_string(),
        }
    }

    /// Query-string pairs (`min`, `max`, `exact`) for the search results route.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(min) = self.min_value {
            pairs.push(("min", min.to_string()));
        }
        if let Some(max) = self.max_value {
            pairs.push(("max", max.to_string()));
        }
        if let Some(exact) = self.exact_value {
            pairs.push(("exact", exact.to_string()));
        }
        pairs
    }
}
