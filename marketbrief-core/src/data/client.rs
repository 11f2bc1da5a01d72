//! Shared blocking HTTP client.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::FetchError;

/// Yahoo rejects default library user agents, so every fetch goes out with
/// a browser-shaped one.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking HTTP client shared by all adapters. One request per fetch,
/// no retries.
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let inner = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");
        Self { inner }
    }

    /// GET a URL and return the body as text.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .inner
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {status} for {url}")));
        }

        resp.text()
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))
    }

    /// GET a URL and deserialize the body as JSON.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let resp = self
            .inner
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {status} for {url}")));
        }

        resp.json()
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
