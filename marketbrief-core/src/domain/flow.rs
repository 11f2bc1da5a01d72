//! ETF flow snapshot document.

use serde::{Deserialize, Serialize};

/// Net inflow reading for a single asset's spot-ETF complex.
///
/// `date` is the human-readable as-of date scraped from the flow page
/// (`"17 Jun 2025"` style); it adjudicates freshness when merging against
/// the stored snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetFlow {
    pub date: Option<String>,
    pub flow_usd_m: Option<f64>,
}

/// The `etf.json` document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSnapshot {
    pub updated_at: String,
    /// Reference date shown on the dashboard: BTC's date, else ETH's.
    pub date: String,
    pub btc: AssetFlow,
    pub eth: AssetFlow,
    pub source: String,
}
