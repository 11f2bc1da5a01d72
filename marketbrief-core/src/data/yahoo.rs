//! Yahoo Finance quote adapters.
//!
//! Two endpoints serve different jobs: the v8 chart API yields a last close
//! plus a percent change derived from the previous close (daily brief), and
//! the v7 batch quote API yields live price/change pairs for many symbols in
//! one call (snapshot and watchlist updates).
//!
//! Yahoo has no official API and is subject to unannounced format changes;
//! every parse failure degrades to an unknown quote.

use std::collections::HashMap;

use serde::Deserialize;

use super::{FetchError, HttpClient};
use crate::domain::{Quote, QuoteSource};

/// Yahoo v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

fn chart_url(symbol: &str) -> String {
    format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?range=5d&interval=1d",
        urlencoding::encode(symbol)
    )
}

fn chart_closes(resp: ChartResponse) -> Result<Vec<f64>, FetchError> {
    let data = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::UnexpectedShape("empty chart result".into()))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::UnexpectedShape("no quote data".into()))?;

    Ok(quote.close.into_iter().flatten().collect())
}

/// Derive a quote from daily closes: last close is the price, the percent
/// change is measured against the close before it. Fewer than two closes
/// (or a zero previous close) leaves the change unknown.
fn quote_from_closes(label: &str, closes: &[f64]) -> Quote {
    if closes.len() < 2 {
        return Quote::unknown(label, QuoteSource::Yahoo);
    }
    let prev = closes[closes.len() - 2];
    let last = closes[closes.len() - 1];
    let change_pct = if prev != 0.0 {
        Some((last - prev) / prev * 100.0)
    } else {
        None
    };
    Quote::new(label, Some(last), change_pct, QuoteSource::Yahoo)
}

/// Fetch a single symbol via the chart API. Never fails: network errors,
/// malformed JSON, and missing fields all yield an unknown quote.
pub fn chart_quote(client: &HttpClient, yf_symbol: &str, label: &str) -> Quote {
    let fetched = client
        .get_json::<ChartResponse>(&chart_url(yf_symbol))
        .and_then(chart_closes);

    match fetched {
        Ok(closes) => quote_from_closes(label, &closes),
        Err(e) => {
            tracing::warn!(symbol = yf_symbol, error = %e, "yahoo chart fetch failed");
            Quote::unknown(label, QuoteSource::Yahoo)
        }
    }
}

/// Yahoo v7 batch quote API response.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResults,
}

#[derive(Debug, Deserialize)]
struct QuoteResults {
    result: Vec<QuoteItem>,
}

#[derive(Debug, Deserialize)]
struct QuoteItem {
    symbol: String,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketChangePercent")]
    regular_market_change_percent: Option<f64>,
}

/// Price and percent change for one symbol from the batch endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteFields {
    pub price: Option<f64>,
    pub change_pct: Option<f64>,
}

/// All quotes returned by one batch call, keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct QuoteBoard {
    by_symbol: HashMap<String, QuoteFields>,
}

impl QuoteBoard {
    /// Build a board directly from symbol → fields pairs (tests and merges).
    pub fn from_fields(entries: impl IntoIterator<Item = (String, QuoteFields)>) -> Self {
        Self {
            by_symbol: entries.into_iter().collect(),
        }
    }

    /// Fields for a symbol; unknown symbols read as absent values.
    pub fn fields(&self, symbol: &str) -> QuoteFields {
        self.by_symbol.get(symbol).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

fn batch_url(symbols: &[&str]) -> String {
    let joined = symbols
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    format!("https://query1.finance.yahoo.com/v7/finance/quote?symbols={joined}")
}

fn board_from_response(resp: QuoteResponse) -> QuoteBoard {
    QuoteBoard::from_fields(resp.quote_response.result.into_iter().map(|item| {
        (
            item.symbol,
            QuoteFields {
                price: item.regular_market_price,
                change_pct: item.regular_market_change_percent,
            },
        )
    }))
}

/// Fetch many symbols in one call via the v7 quote API.
pub fn batch_quotes(client: &HttpClient, symbols: &[&str]) -> Result<QuoteBoard, FetchError> {
    if symbols.is_empty() {
        return Ok(QuoteBoard::default());
    }
    let resp: QuoteResponse = client.get_json(&batch_url(symbols))?;
    Ok(board_from_response(resp))
}
