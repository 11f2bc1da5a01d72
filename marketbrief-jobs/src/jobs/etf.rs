//! ETF flow job: scrape the flow pages, freshness-merge, write `etf.json`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use marketbrief_core::data::flows::{latest_flow, FlowReading};
use marketbrief_core::data::HttpClient;
use marketbrief_core::domain::{AssetFlow, FlowSnapshot};
use marketbrief_core::merge::merge_flow;

use crate::config::EtfConfig;
use crate::reporting::{read_json_or_default, write_json};

fn to_asset_flow(reading: Option<FlowReading>) -> AssetFlow {
    match reading {
        Some(r) => AssetFlow {
            date: Some(r.date),
            flow_usd_m: r.value,
        },
        None => AssetFlow::default(),
    }
}

/// Assemble the next snapshot from the previous one and the live scrapes.
///
/// Each asset merges independently, so a BTC-only outage never stales the
/// ETH reading. The reference `date` shows BTC's as-of date, falling back
/// to ETH's.
pub fn build_snapshot(
    prev: &FlowSnapshot,
    live_btc: Option<FlowReading>,
    live_eth: Option<FlowReading>,
    updated_at: String,
    source: &str,
) -> FlowSnapshot {
    let btc = merge_flow(&to_asset_flow(live_btc), &prev.btc);
    let eth = merge_flow(&to_asset_flow(live_eth), &prev.eth);
    let date = btc
        .date
        .clone()
        .or_else(|| eth.date.clone())
        .unwrap_or_else(|| "n/a".to_string());

    FlowSnapshot {
        updated_at,
        date,
        btc,
        eth,
        source: source.to_string(),
    }
}

pub fn run(client: &HttpClient, config: &EtfConfig, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("etf.json");
    let prev: FlowSnapshot = read_json_or_default(&path);

    let live_btc = latest_flow(client, &config.btc_urls);
    let live_eth = latest_flow(client, &config.eth_urls);

    let doc = build_snapshot(
        &prev,
        live_btc,
        live_eth,
        Utc::now().to_rfc3339(),
        &config.source_label,
    );
    write_json(&path, &doc)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(date: &str, value: f64) -> FlowReading {
        FlowReading {
            date: date.to_string(),
            value: Some(value),
        }
    }

    fn prev_snapshot() -> FlowSnapshot {
        FlowSnapshot {
            updated_at: "2025-06-16T22:00:00Z".to_string(),
            date: "16 Jun 2025".to_string(),
            btc: AssetFlow {
                date: Some("16 Jun 2025".to_string()),
                flow_usd_m: Some(120.0),
            },
            eth: AssetFlow {
                date: Some("16 Jun 2025".to_string()),
                flow_usd_m: Some(30.5),
            },
            source: "farside.co.uk".to_string(),
        }
    }

    #[test]
    fn fresh_scrapes_replace_both_assets() {
        let doc = build_snapshot(
            &prev_snapshot(),
            Some(reading("17 Jun 2025", -45.0)),
            Some(reading("17 Jun 2025", 12.0)),
            "2025-06-17T22:00:00Z".to_string(),
            "farside.co.uk",
        );
        assert_eq!(doc.date, "17 Jun 2025");
        assert_eq!(doc.btc.flow_usd_m, Some(-45.0));
        assert_eq!(doc.eth.flow_usd_m, Some(12.0));
    }

    #[test]
    fn one_failed_scrape_only_stales_that_asset() {
        let doc = build_snapshot(
            &prev_snapshot(),
            None,
            Some(reading("17 Jun 2025", 12.0)),
            "2025-06-17T22:00:00Z".to_string(),
            "farside.co.uk",
        );
        // BTC keeps yesterday's reading, ETH moves on.
        assert_eq!(doc.btc.date.as_deref(), Some("16 Jun 2025"));
        assert_eq!(doc.btc.flow_usd_m, Some(120.0));
        assert_eq!(doc.eth.date.as_deref(), Some("17 Jun 2025"));
        assert_eq!(doc.date, "16 Jun 2025");
    }

    #[test]
    fn stale_scrape_is_rejected_per_asset() {
        let doc = build_snapshot(
            &prev_snapshot(),
            Some(reading("13 Jun 2025", 999.0)),
            None,
            "2025-06-17T22:00:00Z".to_string(),
            "farside.co.uk",
        );
        assert_eq!(doc.btc, prev_snapshot().btc);
        assert_eq!(doc.eth, prev_snapshot().eth);
    }

    #[test]
    fn reference_date_falls_back_to_eth_then_na() {
        let empty = FlowSnapshot::default();
        let doc = build_snapshot(
            &empty,
            None,
            Some(reading("17 Jun 2025", 12.0)),
            "now".to_string(),
            "src",
        );
        assert_eq!(doc.date, "17 Jun 2025");

        let doc = build_snapshot(&empty, None, None, "now".to_string(), "src");
        assert_eq!(doc.date, "n/a");
    }
}
