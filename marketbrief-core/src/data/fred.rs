//! FRED CSV time-series export parsing.
//!
//! FRED's `fredgraph.csv` endpoint returns one date column and one value
//! column named after the series id. Missing observations appear as `"."`.

use super::{FetchError, HttpClient};

/// Latest observation and its change from the prior observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesReading {
    pub value: f64,
    pub delta: f64,
}

fn series_url(series_id: &str) -> String {
    format!("https://fred.stlouisfed.org/graph/fredgraph.csv?id={series_id}")
}

/// Parse a fredgraph CSV export down to its latest reading.
///
/// The value column is matched by series id, falling back to a literal
/// `VALUE` header. Empty and `"."` cells are skipped. A series with a single
/// usable observation reports a zero delta.
pub fn parse_series_csv(series_id: &str, text: &str) -> Result<SeriesReading, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
    let column = headers
        .iter()
        .position(|h| h == series_id)
        .or_else(|| headers.iter().position(|h| h == "VALUE"))
        .ok_or_else(|| {
            FetchError::UnexpectedShape(format!("no '{series_id}' column in CSV header"))
        })?;

    let mut values: Vec<f64> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
        let raw = record.get(column).unwrap_or("").trim();
        if raw.is_empty() || raw == "." {
            continue;
        }
        match raw.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) => continue,
        }
    }

    let latest = *values
        .last()
        .ok_or_else(|| FetchError::UnparseableToken(format!("{series_id}: no observations")))?;
    let prev = if values.len() >= 2 {
        values[values.len() - 2]
    } else {
        latest
    };

    Ok(SeriesReading {
        value: latest,
        delta: latest - prev,
    })
}

/// Fetch the latest reading for one FRED series.
pub fn latest_reading(client: &HttpClient, series_id: &str) -> Result<SeriesReading, FetchError> {
    let text = client.get_text(&series_url(series_id))?;
    parse_series_csv(series_id, &text)
}
