//! CoinGecko simple-price adapter.

use std::collections::HashMap;

use serde::Deserialize;

use super::HttpClient;
use crate::domain::{Quote, QuoteSource};

/// Tracked coins: CoinGecko id → display ticker.
pub const COINS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
    ("ripple", "XRP"),
];

#[derive(Debug, Deserialize)]
struct CoinEntry {
    usd: Option<f64>,
    #[serde(rename = "usd_24h_change")]
    usd_24h_change: Option<f64>,
}

fn price_url() -> String {
    let ids = COINS
        .iter()
        .map(|(id, _)| *id)
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "https://api.coingecko.com/api/v3/simple/price?ids={ids}&vs_currencies=usd&include_24hr_change=true"
    )
}

/// Spot prices with 24h change for every tracked coin, keyed by ticker.
///
/// A failed fetch yields a full map of unknown quotes so rendering can still
/// show every row.
pub fn spot_prices(client: &HttpClient) -> HashMap<String, Quote> {
    let payload = match client.get_json::<HashMap<String, CoinEntry>>(&price_url()) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "coingecko fetch failed");
            return COINS
                .iter()
                .map(|(_, ticker)| {
                    (
                        ticker.to_string(),
                        Quote::unknown(*ticker, QuoteSource::CoinGecko),
                    )
                })
                .collect();
        }
    };

    COINS
        .iter()
        .map(|(id, ticker)| {
            let quote = match payload.get(*id) {
                Some(entry) => Quote::new(
                    *ticker,
                    entry.usd,
                    entry.usd_24h_change,
                    QuoteSource::CoinGecko,
                ),
                None => Quote::unknown(*ticker, QuoteSource::CoinGecko),
            };
            (ticker.to_string(), quote)
        })
        .collect()
}
