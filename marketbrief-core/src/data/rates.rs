//! Currency-rate adapter.

use std::collections::HashMap;

use serde::Deserialize;

use super::HttpClient;

const USD_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// Latest USD→KRW rate, or `None` when the source is unreachable or the
/// currency is missing from the table.
pub fn usd_krw(client: &HttpClient) -> Option<f64> {
    match client.get_json::<RatesResponse>(USD_RATES_URL) {
        Ok(resp) => resp.rates.get("KRW").copied(),
        Err(e) => {
            tracing::warn!(error = %e, "currency rate fetch failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn krw_is_read_from_the_rate_table() {
        let resp: RatesResponse =
            serde_json::from_str(r#"{"rates":{"KRW":1385.2,"JPY":144.9}}"#).unwrap();
        assert_eq!(resp.rates.get("KRW").copied(), Some(1385.2));
    }
}
