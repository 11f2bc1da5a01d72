//! Job configuration: symbol lists, feed queries, FRED series, flow pages.
//!
//! Every section has built-in defaults matching the dashboard's standing
//! lists. A TOML file passed via `--config` can override any section; a
//! missing section falls back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration, one section per job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub brief: BriefConfig,
    pub news: NewsConfig,
    pub etf: EtfConfig,
    pub snapshot: SnapshotConfig,
}

impl JobConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

/// A display label paired with the Yahoo symbol that backs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMapping {
    pub label: String,
    pub symbol: String,
}

fn mapping(label: &str, symbol: &str) -> SymbolMapping {
    SymbolMapping {
        label: label.to_string(),
        symbol: symbol.to_string(),
    }
}

/// Daily briefing inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefConfig {
    pub indices: Vec<SymbolMapping>,
    pub commodities: Vec<SymbolMapping>,
    pub equities: Vec<String>,
    pub macro_query: String,
    pub crypto_query: String,
    pub news_per_bucket: usize,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            indices: vec![
                mapping("S&P500", "^GSPC"),
                mapping("NASDAQ", "^IXIC"),
                mapping("DXY", "DX-Y.NYB"),
                mapping("US10Y", "^TNX"),
                mapping("US2Y", "^IRX"),
                mapping("VIX", "^VIX"),
            ],
            commodities: vec![
                mapping("GOLD", "GC=F"),
                mapping("WTI", "CL=F"),
                mapping("COPPER", "HG=F"),
            ],
            equities: ["AAPL", "MSFT", "NVDA", "AMZN", "META", "COIN", "MSTR"]
                .map(String::from)
                .to_vec(),
            macro_query: "US stocks OR treasury yields OR federal reserve when:1d".to_string(),
            crypto_query: "bitcoin OR ethereum OR crypto regulation when:1d".to_string(),
            news_per_bucket: 3,
        }
    }
}

/// News digest inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub macro_query: String,
    pub crypto_query: String,
    pub items_per_bucket: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            macro_query: "US stock market OR treasury yields OR federal reserve when:1d"
                .to_string(),
            crypto_query: "bitcoin OR ethereum OR crypto ETF OR SEC crypto when:1d".to_string(),
            items_per_bucket: 8,
        }
    }
}

/// ETF flow scrape sources. Each list is tried in order until a page
/// yields a dated reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EtfConfig {
    pub btc_urls: Vec<String>,
    pub eth_urls: Vec<String>,
    pub source_label: String,
}

impl Default for EtfConfig {
    fn default() -> Self {
        Self {
            btc_urls: vec![
                "https://farside.co.uk/btc/".to_string(),
                "https://farside.co.uk/bitcoin-etf-flow-all-data/".to_string(),
            ],
            eth_urls: vec![
                "https://farside.co.uk/eth/".to_string(),
                "https://farside.co.uk/ethereum-etf-flow-all-data/".to_string(),
            ],
            source_label: "farside.co.uk".to_string(),
        }
    }
}

/// Macro/stocks snapshot inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub symbols: SnapshotSymbols,
    pub fred: FredSeries,
    pub watchlist: Vec<WatchlistEntry>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            symbols: SnapshotSymbols::default(),
            fred: FredSeries::default(),
            watchlist: Self::default_watchlist(),
        }
    }
}

/// Yahoo symbols backing each snapshot metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSymbols {
    pub nasdaq: String,
    pub dow: String,
    pub sp500: String,
    pub russell2000: String,
    pub kospi: String,
    pub kosdaq: String,
    pub dxy: String,
    pub gold: String,
    pub silver: String,
    pub wti: String,
    pub copper: String,
}

impl Default for SnapshotSymbols {
    fn default() -> Self {
        Self {
            nasdaq: "^IXIC".to_string(),
            dow: "^DJI".to_string(),
            sp500: "^GSPC".to_string(),
            russell2000: "^RUT".to_string(),
            kospi: "^KS11".to_string(),
            kosdaq: "^KQ11".to_string(),
            dxy: "DX-Y.NYB".to_string(),
            gold: "GC=F".to_string(),
            silver: "SI=F".to_string(),
            wti: "CL=F".to_string(),
            copper: "HG=F".to_string(),
        }
    }
}

/// FRED series ids backing the rate and liquidity metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FredSeries {
    pub us10y: String,
    pub us2y: String,
    pub sofr: String,
    pub iorb: String,
    /// Treasury General Account, millions USD.
    pub tga: String,
    /// Overnight reverse repo, billions USD.
    pub rrp: String,
    /// Repo operations, billions USD.
    pub repo: String,
}

impl Default for FredSeries {
    fn default() -> Self {
        Self {
            us10y: "DGS10".to_string(),
            us2y: "DGS2".to_string(),
            sofr: "SOFR".to_string(),
            iorb: "IORB".to_string(),
            tga: "WTREGEN".to_string(),
            rrp: "RRPONTSYD".to_string(),
            repo: "RPTTLD".to_string(),
        }
    }
}

/// One watchlist ticker with its display grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub group: String,
    pub name: String,
    pub ticker: String,
}

fn watch(group: &str, name: &str, ticker: &str) -> WatchlistEntry {
    WatchlistEntry {
        group: group.to_string(),
        name: name.to_string(),
        ticker: ticker.to_string(),
    }
}

impl SnapshotConfig {
    pub fn default_watchlist() -> Vec<WatchlistEntry> {
        vec![
            watch("Big Tech", "Apple", "AAPL"),
            watch("Big Tech", "Microsoft", "MSFT"),
            watch("Big Tech", "NVIDIA", "NVDA"),
            watch("Big Tech", "Amazon", "AMZN"),
            watch("Big Tech", "Alphabet", "GOOGL"),
            watch("Big Tech", "Meta", "META"),
            watch("Big Tech", "Tesla", "TSLA"),
            watch("Crypto Related", "Robinhood", "HOOD"),
            watch("Crypto Related", "Coinbase", "COIN"),
            watch("Crypto Related", "MicroStrategy/Strategy", "MSTR"),
            watch("Crypto Related", "Marathon Digital", "MARA"),
            watch("Crypto Related", "Riot Platforms", "RIOT"),
            watch("Crypto Related", "Block", "SQ"),
            watch("Crypto Related", "PayPal", "PYPL"),
            watch("Crypto Related", "CME Group", "CME"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config = JobConfig::default();
        assert_eq!(config.brief.indices.len(), 6);
        assert_eq!(config.brief.commodities.len(), 3);
        assert_eq!(config.brief.news_per_bucket, 3);
        assert_eq!(config.news.items_per_bucket, 8);
        assert_eq!(config.snapshot.fred.us10y, "DGS10");
        assert_eq!(config.snapshot.fred.tga, "WTREGEN");
        assert_eq!(config.snapshot.watchlist.len(), 15);
        assert!(!config.etf.btc_urls.is_empty());
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let config: JobConfig = toml::from_str(
            r#"
[news]
items_per_bucket = 4

[etf]
btc_urls = ["https://example.com/btc"]
"#,
        )
        .unwrap();
        assert_eq!(config.news.items_per_bucket, 4);
        // Untouched fields in an overridden section keep their defaults.
        assert!(config.news.macro_query.contains("treasury yields"));
        assert_eq!(config.etf.btc_urls, vec!["https://example.com/btc"]);
        assert_eq!(config.etf.source_label, "farside.co.uk");
        // Untouched sections are fully defaulted.
        assert_eq!(config.brief.indices.len(), 6);
    }
}
