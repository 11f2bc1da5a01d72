//! Quote — a single fetched price with its percent change.

use serde::{Deserialize, Serialize};

/// Price and percent change for one symbol, as returned by a fetch adapter.
///
/// Absent network data yields `None` fields rather than failing the run;
/// downstream rendering substitutes a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: Option<f64>,
    pub change_pct: Option<f64>,
    pub source: QuoteSource,
}

/// Where a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Yahoo,
    CoinGecko,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        price: Option<f64>,
        change_pct: Option<f64>,
        source: QuoteSource,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change_pct,
            source,
        }
    }

    /// A quote whose fetch failed or returned nothing usable.
    pub fn unknown(symbol: impl Into<String>, source: QuoteSource) -> Self {
        Self::new(symbol, None, None, source)
    }

    /// True when the fetch produced at least a price.
    pub fn is_known(&self) -> bool {
        self.price.is_some()
    }
}
