//! News digest job: two RSS topic buckets → `news.json`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use marketbrief_core::data::{news, HttpClient};
use marketbrief_core::domain::NewsDigest;

use crate::config::NewsConfig;
use crate::reporting::write_json;

pub fn run(client: &HttpClient, config: &NewsConfig, output_dir: &Path) -> Result<PathBuf> {
    let digest = NewsDigest {
        updated_at: Utc::now().to_rfc3339(),
        macro_items: news::search_feed(client, &config.macro_query, config.items_per_bucket),
        crypto_items: news::search_feed(client, &config.crypto_query, config.items_per_bucket),
    };

    let path = output_dir.join("news.json");
    write_json(&path, &digest)?;
    Ok(path)
}
