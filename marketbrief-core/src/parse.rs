//! Tolerant token parsing for scraped text.
//!
//! The flow pages are screen-scraped, so every parser here returns `Option`
//! and treats junk input as "no value" rather than an error.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn num_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-+]?\$?[\d,]+(?:\.\d+)?").unwrap())
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{1,2}\s+[A-Za-z]{3}\s+\d{4}\b").unwrap())
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#\d+|[A-Za-z]+);").unwrap())
}

/// Strip tags, unescape common HTML entities, and collapse whitespace.
///
/// This only covers the entities the flow pages actually emit; it is not a
/// general HTML decoder.
pub fn clean_html_text(raw: &str) -> String {
    let stripped = tag_re().replace_all(raw, " ");
    let unescaped = entity_re().replace_all(&stripped, |caps: &regex::Captures<'_>| {
        match &caps[1] {
            "amp" => "&".to_string(),
            "lt" => "<".to_string(),
            "gt" => ">".to_string(),
            "quot" => "\"".to_string(),
            "apos" => "'".to_string(),
            "nbsp" => " ".to_string(),
            other => match other.strip_prefix('#').and_then(|n| n.parse::<u32>().ok()) {
                Some(code) => char::from_u32(code)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string()),
                None => caps[0].to_string(),
            },
        }
    });
    ws_re().replace_all(&unescaped, " ").trim().to_string()
}

/// First numeric token in the text, tolerating thousands separators,
/// currency symbols, and parenthesized negatives.
///
/// `"1,234.5"` → 1234.5, `"(500)"` → -500, `"$2,000"` → 2000,
/// non-numeric text → `None`.
pub fn parse_numeric_token(text: &str) -> Option<f64> {
    let normalized = text.replace('(', "-").replace(')', "");
    let token = num_re().find(&normalized)?;
    let digits = token.as_str().replace(['$', ','], "");
    digits.parse::<f64>().ok()
}

/// Find a `"17 Jun 2025"`-style date token in the text.
pub fn find_date_token(text: &str) -> Option<&str> {
    date_re().find(text).map(|m| m.as_str())
}

/// Parse a `"17 Jun 2025"`-style date.
pub fn parse_human_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d %b %Y").ok()
}
