//! Macro/stocks snapshot job.
//!
//! Fetches a batch of Yahoo quotes, the USD/KRW rate, and seven FRED
//! series, then merges them field by field against the previous documents:
//! live values win, failed sources keep the last known value. Writes
//! `macro_snapshot.json`, `stocks_watchlist.json`, and the display-oriented
//! `snapshot.json`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use marketbrief_core::data::fred::{self, SeriesReading};
use marketbrief_core::data::yahoo::{self, QuoteBoard, QuoteFields};
use marketbrief_core::data::{rates, HttpClient};
use marketbrief_core::domain::{
    Commodities, Fx, Indices, Liquidity, MacroSnapshot, MetricField, Rates, StocksWatchlist,
    WatchlistRow,
};
use marketbrief_core::fmt::{fmt_2, fmt_3, fmt_int};
use marketbrief_core::merge::merge_metric;

use crate::config::SnapshotConfig;
use crate::reporting::{read_json_or_default, write_json};

/// Tickers surfaced in the dashboard's crypto-equity strip.
const CRYPTO_EQUITY_TICKERS: [&str; 5] = ["COIN", "MSTR", "MARA", "RIOT", "HOOD"];

pub struct SnapshotOptions {
    pub output_dir: PathBuf,
    /// Optional second location for the macro snapshot (the dashboard API
    /// mirror).
    pub mirror_dir: Option<PathBuf>,
    pub timezone: Tz,
}

pub struct SnapshotOutcome {
    pub macro_path: PathBuf,
    pub stocks_path: PathBuf,
    pub board_path: PathBuf,
}

/// The display-oriented `snapshot.json` document consumed by the dashboard
/// home page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardBoard {
    #[serde(rename = "asOf")]
    pub as_of: String,
    pub liquidity_checklist: Vec<String>,
    pub indices: Vec<BoardEntry>,
    pub crypto_equities: Vec<BoardEntry>,
    pub commodities: Vec<BoardEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub label: String,
    pub value: String,
    pub delta: f64,
}

/// Per-series FRED readings, `None` where the fetch failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FredInputs {
    pub us10y: Option<SeriesReading>,
    pub us2y: Option<SeriesReading>,
    pub sofr: Option<SeriesReading>,
    pub iorb: Option<SeriesReading>,
    pub tga: Option<SeriesReading>,
    pub rrp: Option<SeriesReading>,
    pub repo: Option<SeriesReading>,
}

impl FredInputs {
    fn any(&self) -> bool {
        self.us10y.is_some()
            || self.us2y.is_some()
            || self.sofr.is_some()
            || self.iorb.is_some()
            || self.tga.is_some()
            || self.rrp.is_some()
            || self.repo.is_some()
    }
}

/// Everything fetched live for one snapshot run. Kept separate from the
/// merge so the document assembly can be exercised without a network.
#[derive(Debug, Default)]
pub struct LiveInputs {
    pub quotes: Option<QuoteBoard>,
    pub usd_krw: Option<f64>,
    pub fred: FredInputs,
}

impl LiveInputs {
    /// True when at least one source answered; gates the as-of refresh.
    pub fn fetched_any(&self) -> bool {
        self.quotes.is_some() || self.usd_krw.is_some() || self.fred.any()
    }
}

fn fred_reading(client: &HttpClient, series_id: &str) -> Option<SeriesReading> {
    match fred::latest_reading(client, series_id) {
        Ok(reading) => Some(reading),
        Err(e) => {
            tracing::warn!(series_id, error = %e, "fred series fetch failed");
            None
        }
    }
}

/// Fetch every input sequentially. Each source degrades independently.
pub fn fetch_live(client: &HttpClient, config: &SnapshotConfig) -> LiveInputs {
    let symbols: BTreeSet<&str> = [
        config.symbols.nasdaq.as_str(),
        config.symbols.dow.as_str(),
        config.symbols.sp500.as_str(),
        config.symbols.russell2000.as_str(),
        config.symbols.kospi.as_str(),
        config.symbols.kosdaq.as_str(),
        config.symbols.dxy.as_str(),
        config.symbols.gold.as_str(),
        config.symbols.silver.as_str(),
        config.symbols.wti.as_str(),
        config.symbols.copper.as_str(),
    ]
    .into_iter()
    .chain(config.watchlist.iter().map(|w| w.ticker.as_str()))
    .collect();
    let symbols: Vec<&str> = symbols.into_iter().collect();

    let quotes = match yahoo::batch_quotes(client, &symbols) {
        Ok(board) => Some(board),
        Err(e) => {
            tracing::warn!(error = %e, "yahoo batch quote fetch failed");
            None
        }
    };

    let usd_krw = rates::usd_krw(client);

    let fred = FredInputs {
        us10y: fred_reading(client, &config.fred.us10y),
        us2y: fred_reading(client, &config.fred.us2y),
        sofr: fred_reading(client, &config.fred.sofr),
        iorb: fred_reading(client, &config.fred.iorb),
        tga: fred_reading(client, &config.fred.tga),
        rrp: fred_reading(client, &config.fred.rrp),
        repo: fred_reading(client, &config.fred.repo),
    };

    LiveInputs {
        quotes,
        usd_krw,
        fred,
    }
}

fn merge_series(
    reading: Option<SeriesReading>,
    prev: &MetricField,
    format: impl Fn(f64) -> String,
) -> MetricField {
    merge_metric(
        reading.map(|r| r.value),
        reading.map(|r| r.delta),
        prev,
        format,
    )
}

fn merge_quote(
    fields: QuoteFields,
    prev: &MetricField,
    format: impl Fn(f64) -> String,
) -> MetricField {
    merge_metric(fields.price, fields.change_pct, prev, format)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Build the three output documents from the previous state and the live
/// inputs. Pure: all I/O stays in [`run`].
pub fn build_documents(
    config: &SnapshotConfig,
    prev_macro: &MacroSnapshot,
    prev_stocks: &StocksWatchlist,
    live: &LiveInputs,
    now_label: &str,
) -> (MacroSnapshot, StocksWatchlist, DashboardBoard) {
    let as_of = if live.fetched_any() || prev_macro.as_of.is_empty() {
        now_label.to_string()
    } else {
        prev_macro.as_of.clone()
    };

    let quote = |symbol: &str| {
        live.quotes
            .as_ref()
            .map(|board| board.fields(symbol))
            .unwrap_or_default()
    };

    let rates_cat = Rates {
        us10y: merge_series(live.fred.us10y, &prev_macro.rates.us10y, fmt_2),
        us2y: merge_series(live.fred.us2y, &prev_macro.rates.us2y, fmt_2),
        sofr: merge_series(live.fred.sofr, &prev_macro.rates.sofr, fmt_2),
        iorb: merge_series(live.fred.iorb, &prev_macro.rates.iorb, fmt_2),
    };

    let fx = Fx {
        dxy: merge_quote(quote(&config.symbols.dxy), &prev_macro.fx.dxy, fmt_2),
        // The rate API reports no day-over-day change.
        usdkrw: merge_metric(live.usd_krw, Some(0.0), &prev_macro.fx.usdkrw, fmt_int),
    };

    let indices = Indices {
        kospi: merge_quote(quote(&config.symbols.kospi), &prev_macro.indices.kospi, fmt_int),
        kosdaq: merge_quote(quote(&config.symbols.kosdaq), &prev_macro.indices.kosdaq, fmt_int),
        nasdaq: merge_quote(quote(&config.symbols.nasdaq), &prev_macro.indices.nasdaq, fmt_int),
        dow: merge_quote(quote(&config.symbols.dow), &prev_macro.indices.dow, fmt_int),
        russell2000: merge_quote(
            quote(&config.symbols.russell2000),
            &prev_macro.indices.russell2000,
            fmt_int,
        ),
        sp500: merge_quote(quote(&config.symbols.sp500), &prev_macro.indices.sp500, fmt_int),
    };

    let commodities = Commodities {
        gold: merge_quote(quote(&config.symbols.gold), &prev_macro.commodities.gold, |v| {
            format!("${}/oz", fmt_int(v))
        }),
        silver: merge_quote(
            quote(&config.symbols.silver),
            &prev_macro.commodities.silver,
            |v| format!("${}/oz", fmt_2(v)),
        ),
        wti: merge_quote(quote(&config.symbols.wti), &prev_macro.commodities.wti, |v| {
            format!("${}", fmt_2(v))
        }),
        copper: merge_quote(
            quote(&config.symbols.copper),
            &prev_macro.commodities.copper,
            |v| format!("${}/lb", fmt_2(v)),
        ),
    };

    let liquidity = Liquidity {
        rrp: merge_series(live.fred.rrp, &prev_macro.liquidity.rrp, fmt_2),
        tga: merge_series(live.fred.tga, &prev_macro.liquidity.tga, fmt_int),
        repo: merge_series(live.fred.repo, &prev_macro.liquidity.repo, fmt_3),
        qt_status: prev_macro.liquidity.qt_status.clone(),
    };

    let macro_doc = MacroSnapshot {
        as_of: as_of.clone(),
        rates: rates_cat,
        fx,
        indices,
        commodities,
        liquidity,
    };

    let rows: Vec<WatchlistRow> = config
        .watchlist
        .iter()
        .map(|entry| {
            let fields = quote(&entry.ticker);
            let prev_row = prev_stocks.row(&entry.ticker);
            let price = fields
                .price
                .map(round2)
                .or_else(|| prev_row.and_then(|r| r.price));
            let change = fields
                .change_pct
                .map(round2)
                .unwrap_or_else(|| prev_row.map(|r| r.change).unwrap_or(0.0));
            WatchlistRow {
                group: entry.group.clone(),
                name: entry.name.clone(),
                ticker: entry.ticker.clone(),
                price,
                change,
            }
        })
        .collect();

    let stocks_doc = StocksWatchlist {
        as_of: as_of.clone(),
        rows,
    };

    let board = build_board(&macro_doc, &stocks_doc);

    (macro_doc, stocks_doc, board)
}

fn board_entry(label: &str, field: &MetricField) -> BoardEntry {
    BoardEntry {
        label: label.to_string(),
        value: field.display.clone(),
        delta: field.delta,
    }
}

fn build_board(macro_doc: &MacroSnapshot, stocks: &StocksWatchlist) -> DashboardBoard {
    let crypto_equities = CRYPTO_EQUITY_TICKERS
        .iter()
        .filter_map(|ticker| stocks.row(ticker))
        .map(|row| BoardEntry {
            label: row.ticker.clone(),
            value: match row.price {
                Some(p) => format!("{p:.2}"),
                None => "—".to_string(),
            },
            delta: row.change,
        })
        .collect();

    DashboardBoard {
        as_of: macro_doc.as_of.clone(),
        liquidity_checklist: vec![
            format!(
                "S&P500 {:+.2}% / NASDAQ {:+.2}%",
                macro_doc.indices.sp500.delta, macro_doc.indices.nasdaq.delta
            ),
            format!(
                "US10Y {} ({:+.2}%) / US2Y {} ({:+.2}%)",
                macro_doc.rates.us10y.display_or_na(),
                macro_doc.rates.us10y.delta,
                macro_doc.rates.us2y.display_or_na(),
                macro_doc.rates.us2y.delta
            ),
        ],
        indices: vec![
            board_entry("S&P 500", &macro_doc.indices.sp500),
            board_entry("NASDAQ", &macro_doc.indices.nasdaq),
            board_entry("KOSPI", &macro_doc.indices.kospi),
            board_entry("KOSDAQ", &macro_doc.indices.kosdaq),
        ],
        crypto_equities,
        commodities: vec![
            board_entry("Gold", &macro_doc.commodities.gold),
            board_entry("Silver", &macro_doc.commodities.silver),
            board_entry("Copper", &macro_doc.commodities.copper),
        ],
    }
}

pub fn run(
    client: &HttpClient,
    config: &SnapshotConfig,
    opts: &SnapshotOptions,
) -> Result<SnapshotOutcome> {
    let macro_path = opts.output_dir.join("macro_snapshot.json");
    let stocks_path = opts.output_dir.join("stocks_watchlist.json");
    let board_path = opts.output_dir.join("snapshot.json");

    let prev_macro: MacroSnapshot = read_json_or_default(&macro_path);
    let prev_stocks: StocksWatchlist = read_json_or_default(&stocks_path);

    let live = fetch_live(client, config);
    let now_label = Utc::now()
        .with_timezone(&opts.timezone)
        .format("%Y-%m-%d %H:%M %Z")
        .to_string();

    let (macro_doc, stocks_doc, board_doc) =
        build_documents(config, &prev_macro, &prev_stocks, &live, &now_label);

    write_json(&macro_path, &macro_doc)?;
    if let Some(mirror) = &opts.mirror_dir {
        write_json(&mirror.join("snapshot.json"), &macro_doc)?;
    }
    write_json(&stocks_path, &stocks_doc)?;
    write_json(&board_path, &board_doc)?;

    Ok(SnapshotOutcome {
        macro_path,
        stocks_path,
        board_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prev_macro() -> MacroSnapshot {
        let mut prev = MacroSnapshot::default();
        prev.as_of = "2025-06-16 17:00 KST".to_string();
        prev.rates.us10y = MetricField::new(4.00, 0.02, "4.00");
        prev.fx.usdkrw = MetricField::new(1380.0, 0.0, "1,380");
        prev.indices.sp500 = MetricField::new(6000.0, 0.8, "6,000");
        prev
    }

    fn board_with(entries: &[(&str, f64, f64)]) -> QuoteBoard {
        QuoteBoard::from_fields(entries.iter().map(|(s, p, c)| {
            (
                s.to_string(),
                QuoteFields {
                    price: Some(*p),
                    change_pct: Some(*c),
                },
            )
        }))
    }

    #[test]
    fn total_outage_keeps_every_field_and_the_as_of() {
        let config = SnapshotConfig::default();
        let prev = prev_macro();
        let (macro_doc, _, _) = build_documents(
            &config,
            &prev,
            &StocksWatchlist::default(),
            &LiveInputs::default(),
            "2025-06-17 09:30 KST",
        );

        assert_eq!(macro_doc.rates.us10y, prev.rates.us10y);
        assert_eq!(macro_doc.fx.usdkrw, prev.fx.usdkrw);
        assert_eq!(macro_doc.indices.sp500, prev.indices.sp500);
        assert_eq!(macro_doc.as_of, "2025-06-16 17:00 KST");
    }

    #[test]
    fn partial_outage_only_stales_the_affected_fields() {
        // Yahoo answers, FRED does not: us10y keeps its stored value while
        // the index refreshes.
        let config = SnapshotConfig::default();
        let prev = prev_macro();
        let live = LiveInputs {
            quotes: Some(board_with(&[("^GSPC", 6100.0, 1.2)])),
            usd_krw: None,
            fred: FredInputs::default(),
        };
        let (macro_doc, _, _) = build_documents(
            &config,
            &prev,
            &StocksWatchlist::default(),
            &live,
            "2025-06-17 09:30 KST",
        );

        assert_eq!(macro_doc.rates.us10y.value, Some(4.00));
        assert_eq!(macro_doc.rates.us10y.display, "4.00");
        assert_eq!(macro_doc.indices.sp500.value, Some(6100.0));
        assert_eq!(macro_doc.indices.sp500.display, "6,100");
        assert_eq!(macro_doc.as_of, "2025-06-17 09:30 KST");
    }

    #[test]
    fn fred_reading_updates_value_delta_and_display() {
        let config = SnapshotConfig::default();
        let live = LiveInputs {
            quotes: None,
            usd_krw: None,
            fred: FredInputs {
                us10y: Some(SeriesReading {
                    value: 4.45,
                    delta: 0.04,
                }),
                ..FredInputs::default()
            },
        };
        let (macro_doc, _, _) = build_documents(
            &config,
            &prev_macro(),
            &StocksWatchlist::default(),
            &live,
            "2025-06-17 09:30 KST",
        );
        assert_eq!(macro_doc.rates.us10y.value, Some(4.45));
        assert_eq!(macro_doc.rates.us10y.delta, 0.04);
        assert_eq!(macro_doc.rates.us10y.display, "4.45");
    }

    #[test]
    fn commodity_displays_carry_units() {
        let config = SnapshotConfig::default();
        let live = LiveInputs {
            quotes: Some(board_with(&[
                ("GC=F", 3350.4, 0.5),
                ("SI=F", 36.25, -0.2),
                ("CL=F", 71.8, 1.1),
                ("HG=F", 4.81, 0.0),
            ])),
            usd_krw: None,
            fred: FredInputs::default(),
        };
        let (macro_doc, _, _) = build_documents(
            &config,
            &MacroSnapshot::default(),
            &StocksWatchlist::default(),
            &live,
            "now",
        );
        assert_eq!(macro_doc.commodities.gold.display, "$3,350/oz");
        assert_eq!(macro_doc.commodities.silver.display, "$36.25/oz");
        assert_eq!(macro_doc.commodities.wti.display, "$71.80");
        assert_eq!(macro_doc.commodities.copper.display, "$4.81/lb");
    }

    #[test]
    fn watchlist_rows_round_and_fall_back_per_ticker() {
        let config = SnapshotConfig::default();
        let prev_stocks = StocksWatchlist {
            as_of: "old".to_string(),
            rows: vec![WatchlistRow {
                group: "Big Tech".to_string(),
                name: "Apple".to_string(),
                ticker: "AAPL".to_string(),
                price: Some(229.9),
                change: -0.4,
            }],
        };
        let live = LiveInputs {
            quotes: Some(board_with(&[("MSFT", 470.456, 1.237)])),
            usd_krw: None,
            fred: FredInputs::default(),
        };
        let (_, stocks_doc, _) = build_documents(
            &config,
            &MacroSnapshot::default(),
            &prev_stocks,
            &live,
            "now",
        );

        let msft = stocks_doc.rows.iter().find(|r| r.ticker == "MSFT").unwrap();
        assert_eq!(msft.price, Some(470.46));
        assert_eq!(msft.change, 1.24);

        // AAPL missing from the live board keeps its previous row values.
        let aapl = stocks_doc.rows.iter().find(|r| r.ticker == "AAPL").unwrap();
        assert_eq!(aapl.price, Some(229.9));
        assert_eq!(aapl.change, -0.4);

        // Never-seen tickers stay empty rather than failing.
        let tsla = stocks_doc.rows.iter().find(|r| r.ticker == "TSLA").unwrap();
        assert_eq!(tsla.price, None);
        assert_eq!(tsla.change, 0.0);
    }

    #[test]
    fn board_lists_only_known_crypto_equities() {
        let config = SnapshotConfig::default();
        let live = LiveInputs {
            quotes: Some(board_with(&[("COIN", 251.333, 2.1), ("MSTR", 390.0, -1.0)])),
            usd_krw: None,
            fred: FredInputs::default(),
        };
        let (_, _, board) = build_documents(
            &config,
            &MacroSnapshot::default(),
            &StocksWatchlist::default(),
            &live,
            "now",
        );

        let labels: Vec<&str> = board
            .crypto_equities
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert!(labels.contains(&"COIN"));
        assert!(labels.contains(&"MSTR"));
        let coin = board
            .crypto_equities
            .iter()
            .find(|e| e.label == "COIN")
            .unwrap();
        assert_eq!(coin.value, "251.33");
    }

    #[test]
    fn first_run_with_no_previous_state_uses_now() {
        let config = SnapshotConfig::default();
        let (macro_doc, _, _) = build_documents(
            &config,
            &MacroSnapshot::default(),
            &StocksWatchlist::default(),
            &LiveInputs::default(),
            "2025-06-17 09:30 KST",
        );
        assert_eq!(macro_doc.as_of, "2025-06-17 09:30 KST");
        assert_eq!(macro_doc.rates.us10y, MetricField::default());
    }
}
