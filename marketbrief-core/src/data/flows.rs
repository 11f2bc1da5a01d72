//! ETF flow-page scraping.
//!
//! Brittle by design: this is not a general HTML parser. It tolerates
//! missing and malformed rows and only understands the two known page
//! shapes — a flow table whose trailing column holds the daily total, and a
//! free-text summary block. The two strategies stay independent and are
//! tried in sequence.

use std::sync::OnceLock;

use regex::Regex;

use super::HttpClient;
use crate::parse::{clean_html_text, find_date_token, parse_human_date, parse_numeric_token};

/// The latest dated reading found on a flow page.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReading {
    pub date: String,
    pub value: Option<f64>,
}

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap())
}

fn cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<t[dh][^>]*>(.*?)</t[dh]>").unwrap())
}

/// Scan a flow table for its most recent dated row.
///
/// Rows without a parseable date in the first cell are skipped. The row
/// value is the first parseable numeric token scanning cells right to left,
/// because the total sits in the last (or near-last) column. The date cell
/// is excluded from the scan — its day-of-month would otherwise parse as a
/// value on rows with no numeric columns.
pub fn scrape_flow_table(html: &str) -> Option<FlowReading> {
    let mut best: Option<(chrono::NaiveDate, FlowReading)> = None;

    for row in row_re().captures_iter(html) {
        let cells: Vec<String> = cell_re()
            .captures_iter(&row[1])
            .map(|c| clean_html_text(&c[1]))
            .collect();
        if cells.len() < 2 {
            continue;
        }

        let Some(date_text) = find_date_token(&cells[0]) else {
            continue;
        };
        let Some(date) = parse_human_date(date_text) else {
            continue;
        };

        let value = cells[1..].iter().rev().find_map(|c| parse_numeric_token(c));

        let fresher = match &best {
            Some((best_date, _)) => date > *best_date,
            None => true,
        };
        if fresher {
            best = Some((
                date,
                FlowReading {
                    date: date_text.to_string(),
                    value,
                },
            ));
        }
    }

    best.map(|(_, reading)| reading)
}

/// Fallback for pages that carry the latest total in prose instead of a
/// table: first date token in the cleaned text, first numeric token after it.
pub fn scrape_summary_text(html: &str) -> Option<FlowReading> {
    let text = clean_html_text(html);
    let date_match = find_date_token(&text)?;
    let date_end = text.find(date_match)? + date_match.len();
    let value = parse_numeric_token(&text[date_end..]);

    Some(FlowReading {
        date: date_match.to_string(),
        value,
    })
}

fn scrape_any(html: &str) -> Option<FlowReading> {
    scrape_flow_table(html).or_else(|| scrape_summary_text(html))
}

/// Fetch the candidate pages in order and return the first usable reading.
pub fn latest_flow(client: &HttpClient, urls: &[String]) -> Option<FlowReading> {
    for url in urls {
        let html = match client.get_text(url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "flow page fetch failed");
                continue;
            }
        };
        if let Some(reading) = scrape_any(&html) {
            return Some(reading);
        }
        tracing::warn!(url = %url, "flow page had no dated rows");
    }
    None
}
