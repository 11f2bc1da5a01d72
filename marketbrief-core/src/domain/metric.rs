//! MetricField and the macro snapshot document.

use serde::{Deserialize, Serialize};

use crate::fmt::PLACEHOLDER;

/// One displayed data point: raw value, change, and a preformatted string.
///
/// Invariant: `display` is always a formatted string — the placeholder stands
/// in when `value` is `None`. Each job reads these from the previous snapshot
/// at start, possibly overwrites them with live values, and always writes
/// them back at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricField {
    pub value: Option<f64>,
    pub delta: f64,
    pub display: String,
}

impl Default for MetricField {
    fn default() -> Self {
        Self {
            value: None,
            delta: 0.0,
            display: PLACEHOLDER.to_string(),
        }
    }
}

impl MetricField {
    pub fn new(value: f64, delta: f64, display: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            delta,
            display: display.into(),
        }
    }

    /// `display`, or `"n/a"` when the field has never held a value.
    pub fn display_or_na(&self) -> &str {
        if self.display == PLACEHOLDER {
            "n/a"
        } else {
            &self.display
        }
    }
}

/// The `macro_snapshot.json` document: category → metric → field, plus an
/// as-of timestamp. This is the sole durable state between runs; every field
/// defaults when the previous file is missing or corrupt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroSnapshot {
    pub as_of: String,
    pub rates: Rates,
    pub fx: Fx,
    pub indices: Indices,
    pub commodities: Commodities,
    pub liquidity: Liquidity,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rates {
    pub us10y: MetricField,
    pub us2y: MetricField,
    pub sofr: MetricField,
    pub iorb: MetricField,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fx {
    pub dxy: MetricField,
    pub usdkrw: MetricField,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Indices {
    pub kospi: MetricField,
    pub kosdaq: MetricField,
    pub nasdaq: MetricField,
    pub dow: MetricField,
    pub russell2000: MetricField,
    pub sp500: MetricField,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Commodities {
    pub gold: MetricField,
    pub silver: MetricField,
    pub wti: MetricField,
    pub copper: MetricField,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Liquidity {
    pub rrp: MetricField,
    pub tga: MetricField,
    pub repo: MetricField,
    /// Free-text QT status line, carried over run to run.
    pub qt_status: String,
}

impl Default for Liquidity {
    fn default() -> Self {
        Self {
            rrp: MetricField::default(),
            tga: MetricField::default(),
            repo: MetricField::default(),
            qt_status: "ongoing (balance sheet runoff)".to_string(),
        }
    }
}
