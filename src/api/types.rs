//! Simulation service request and response types.
//!
//! These types model the JSON bodies exchanged with the simulation backend:
//! ticker lookup, the simulation catalogue, simulation runs and cache
//! maintenance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One ticker returned by a lookup.
///
/// Identified by `symbol`; `name` is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// The ticker symbol (e.g., "AAPL").
    pub symbol: String,
    /// The company or fund name.
    #[serde(default)]
    pub name: String,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Response of `GET /search_tickers?query=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerSearchResponse {
    /// Matching tickers in backend ranking order.
    #[serde(default)]
    pub results: Vec<Candidate>,
}

/// A simulation the backend can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOption {
    /// Identifier sent back in the `simulations` parameter.
    pub id: String,
    /// Human readable name.
    pub name: String,
}

/// Response of `GET /available_simulations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSimulations {
    /// All runnable simulations.
    #[serde(default)]
    pub simulations: Vec<SimulationOption>,
}

/// A fully validated simulation run request.
///
/// Built by the form layer; amounts are plain digits without separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    /// First simulated day (`YYYY-MM-DD`).
    pub start_date: String,
    /// Last simulated day (`YYYY-MM-DD`).
    pub end_date: String,
    /// Amount invested on the first day.
    pub initial_investment: String,
    /// Amount invested every month.
    pub monthly_investment: String,
    /// Selected simulation ids, never empty.
    pub simulations: Vec<String>,
    /// Selected ticker symbols, possibly empty.
    pub tickers: Vec<String>,
}

impl SimulationRequest {
    /// Query parameters for `GET /simulate`.
    ///
    /// `tickers` is only present when at least one ticker is selected.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("start_date", self.start_date.clone()),
            ("end_date", self.end_date.clone()),
            ("initial_investment", self.initial_investment.clone()),
            ("monthly_investment", self.monthly_investment.clone()),
            ("simulations", self.simulations.join(",")),
        ];
        if !self.tickers.is_empty() {
            pairs.push(("tickers", self.tickers.join(",")));
        }
        pairs
    }
}

/// Raw response of `GET /simulate`: Plotly `data` and `layout`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartResponse {
    /// Plotly traces.
    #[serde(default)]
    pub data: Option<Vec<Trace>>,
    /// Plotly layout object.
    #[serde(default)]
    pub layout: Option<Value>,
}

/// A single Plotly trace (one simulated account).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    /// Account name shown in the legend.
    #[serde(default)]
    pub name: Option<String>,
    /// Dates.
    #[serde(default)]
    pub x: Vec<Value>,
    /// Balances.
    #[serde(default)]
    pub y: Vec<Value>,
}

impl Trace {
    /// Number of plotted points.
    pub fn point_count(&self) -> usize {
        self.y.len()
    }

    /// The last balance, if it is numeric.
    pub fn final_value(&self) -> Option<f64> {
        self.y.last().and_then(Value::as_f64)
    }

    /// The last date label, if any.
    pub fn final_label(&self) -> Option<String> {
        self.x.last().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Simulation output with both Plotly halves present.
#[derive(Debug, Clone)]
pub struct SimulationChart {
    /// The plotted traces.
    pub traces: Vec<Trace>,
    /// The layout object.
    pub layout: Value,
}

impl SimulationChart {
    /// The chart title from the layout, if set.
    ///
    /// Plotly accepts either a bare string or `{ "text": ... }`.
    pub fn title(&self) -> Option<&str> {
        match self.layout.get("title")? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("text").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl TryFrom<ChartResponse> for SimulationChart {
    type Error = String;

    fn try_from(response: ChartResponse) -> Result<Self, Self::Error> {
        match (response.data, response.layout) {
            (Some(traces), Some(layout)) if !layout.is_null() => Ok(Self { traces, layout }),
            _ => Err("Invalid response from the server.".to_string()),
        }
    }
}

/// Success body of the cache maintenance endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation text.
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The server's error description.
    pub error: String,
}
