//! Durable output files: JSON documents and dated markdown reports.
//!
//! Filesystem faults are the only errors a job surfaces to the CLI, so the
//! writers propagate with context while the reader degrades silently — a
//! missing or corrupt previous snapshot must never abort a run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a previous JSON document, degrading to the default on any error.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return T::default(),
    };
    match serde_json::from_str(&text) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "previous document unreadable, starting fresh");
            T::default()
        }
    }
}

/// Write a pretty-printed JSON document with a trailing newline, creating
/// parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut text = serde_json::to_string_pretty(value).context("failed to serialize document")?;
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Write a dated markdown report plus its `latest` alias.
///
/// Returns `(dated_path, latest_path)`.
pub fn write_markdown_report(
    dir: &Path,
    stem: &str,
    date_stamp: &str,
    doc: &str,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let dated = dir.join(format!("{stem}_{date_stamp}.md"));
    let latest = dir.join(format!("{stem}_latest.md"));

    let mut text = doc.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }

    std::fs::write(&dated, &text).with_context(|| format!("failed to write {}", dated.display()))?;
    std::fs::copy(&dated, &latest)
        .with_context(|| format!("failed to update {}", latest.display()))?;

    Ok((dated, latest))
}
