//! Crypto fear-greed index adapter.

use serde::Deserialize;

use super::HttpClient;

const FNG_URL: &str = "https://api.alternative.me/fng/?limit=1&format=json";

#[derive(Debug, Deserialize)]
struct FngResponse {
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    // The API reports the value as a string.
    value: String,
}

fn latest_value(resp: FngResponse) -> Option<f64> {
    resp.data.first()?.value.trim().parse().ok()
}

/// Latest fear-greed reading, or `None` when the source is down or the
/// payload shape changed.
pub fn fear_greed(client: &HttpClient) -> Option<f64> {
    match client.get_json::<FngResponse>(FNG_URL) {
        Ok(resp) => latest_value(resp),
        Err(e) => {
            tracing::warn!(error = %e, "fear-greed fetch failed");
            None
        }
    }
}
