//! Application settings sections.

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_TIMEOUT_SECS;

/// Where the simulation backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the simulation service.
    pub base_url: String,
    /// Request timeout in seconds. Simulations can take a while.
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Ticker search behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Ignore lookup responses that belong to an older query.
    pub discard_stale_results: bool,
    /// Dropdown height in rows.
    pub max_visible_candidates: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            discard_stale_results: false,
            max_visible_candidates: 8,
        }
    }
}

/// Initial form values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Tickers selected when the form opens.
    pub default_tickers: Vec<String>,
    /// Initial investment amount.
    pub initial_investment: u64,
    /// Monthly investment amount.
    pub monthly_investment: u64,
    /// Length of the default date range in years.
    pub history_years: u32,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            default_tickers: vec!["TSLA".to_string(), "NVDA".to_string(), "MSFT".to_string()],
            initial_investment: 0,
            monthly_investment: 500,
            history_years: 3,
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Event loop tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}
