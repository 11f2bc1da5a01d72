//! Stocks watchlist document.

use serde::{Deserialize, Serialize};

/// One watchlist ticker with its last known price and percent change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchlistRow {
    pub group: String,
    pub name: String,
    pub ticker: String,
    pub price: Option<f64>,
    pub change: f64,
}

/// The `stocks_watchlist.json` document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StocksWatchlist {
    pub as_of: String,
    pub rows: Vec<WatchlistRow>,
}

impl StocksWatchlist {
    /// Row lookup by ticker, case-insensitive.
    pub fn row(&self, ticker: &str) -> Option<&WatchlistRow> {
        self.rows
            .iter()
            .find(|r| r.ticker.eq_ignore_ascii_case(ticker))
    }
}
