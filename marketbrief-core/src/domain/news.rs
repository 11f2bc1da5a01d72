//! News feed entries and the persisted news document.

use serde::{Deserialize, Serialize};

/// A single feed entry. Feed parsing filters out entries with an empty
/// title or link, whatever their other fields contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

/// The `news.json` document: two topic buckets plus a refresh timestamp.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsDigest {
    pub updated_at: String,
    #[serde(rename = "macro")]
    pub macro_items: Vec<NewsItem>,
    #[serde(rename = "crypto")]
    pub crypto_items: Vec<NewsItem>,
}
