//! Stale-tolerant snapshot merging.
//!
//! Each run prefers freshly fetched values but keeps the last known value
//! per field when a fetch fails. The rule is applied independently per
//! field, so a partial outage only falls back the affected fields.

use crate::domain::{AssetFlow, MetricField};
use crate::parse::parse_human_date;

/// Merge a live reading into a metric field.
///
/// A present live value wins: the result carries it, the live delta (zero
/// when the source provides none), and the formatted display. An absent
/// live value keeps the previous field exactly.
pub fn merge_metric(
    live_value: Option<f64>,
    live_delta: Option<f64>,
    prev: &MetricField,
    format: impl Fn(f64) -> String,
) -> MetricField {
    match live_value {
        Some(value) => MetricField {
            value: Some(value),
            delta: live_delta.unwrap_or(0.0),
            display: format(value),
        },
        None => prev.clone(),
    }
}

/// Merge a freshly scraped flow reading into the stored one.
///
/// Freshness is adjudicated by calendar date: the chronologically later
/// date's values win, even when the older reading carries a numeric value.
/// A live reading whose date fails to parse keeps the stored flow
/// unconditionally; a stored flow without a parseable date yields to any
/// dated live reading.
pub fn merge_flow(live: &AssetFlow, prev: &AssetFlow) -> AssetFlow {
    let live_date = match live.date.as_deref().and_then(parse_human_date) {
        Some(d) => d,
        None => return prev.clone(),
    };

    match prev.date.as_deref().and_then(parse_human_date) {
        Some(prev_date) if live_date < prev_date => prev.clone(),
        _ => live.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt::fmt_2;

    fn prev_field() -> MetricField {
        MetricField::new(4.00, 0.02, "4.00")
    }

    #[test]
    fn absent_live_value_keeps_previous_field_exactly() {
        let prev = prev_field();
        let merged = merge_metric(None, None, &prev, fmt_2);
        assert_eq!(merged, prev);
    }

    #[test]
    fn present_live_value_wins_and_is_reformatted() {
        let merged = merge_metric(Some(4.42), Some(0.03), &prev_field(), fmt_2);
        assert_eq!(merged.value, Some(4.42));
        assert_eq!(merged.delta, 0.03);
        assert_eq!(merged.display, "4.42");
    }

    #[test]
    fn missing_live_delta_becomes_zero() {
        let merged = merge_metric(Some(1385.0), None, &prev_field(), |v| format!("{v:.0}"));
        assert_eq!(merged.delta, 0.0);
        assert_eq!(merged.display, "1385");
    }

    fn flow(date: Option<&str>, value: Option<f64>) -> AssetFlow {
        AssetFlow {
            date: date.map(str::to_string),
            flow_usd_m: value,
        }
    }

    #[test]
    fn fresher_scrape_wins() {
        let prev = flow(Some("16 Jun 2025"), Some(120.0));
        let live = flow(Some("17 Jun 2025"), Some(-45.0));
        assert_eq!(merge_flow(&live, &prev), live);
    }

    #[test]
    fn stale_scrape_cannot_overwrite_newer_stored_value() {
        let prev = flow(Some("17 Jun 2025"), Some(-45.0));
        let live = flow(Some("16 Jun 2025"), Some(120.0));
        assert_eq!(merge_flow(&live, &prev), prev);
    }

    #[test]
    fn same_day_scrape_refreshes_the_value() {
        let prev = flow(Some("17 Jun 2025"), Some(-45.0));
        let live = flow(Some("17 Jun 2025"), Some(-52.5));
        assert_eq!(merge_flow(&live, &prev), live);
    }

    #[test]
    fn unparseable_live_date_keeps_previous_unconditionally() {
        let prev = flow(Some("16 Jun 2025"), Some(120.0));
        let live = flow(Some("yesterday-ish"), Some(999.0));
        assert_eq!(merge_flow(&live, &prev), prev);

        let undated = flow(None, Some(999.0));
        assert_eq!(merge_flow(&undated, &prev), prev);
    }

    #[test]
    fn undated_stored_flow_yields_to_a_dated_scrape() {
        let prev = flow(None, Some(120.0));
        let live = flow(Some("16 Jun 2025"), Some(-45.0));
        assert_eq!(merge_flow(&live, &prev), live);
    }

    #[test]
    fn late_arriving_older_date_is_ignored() {
        // A < B < C: after C lands, a late B must not displace it.
        let a = flow(Some("10 Jun 2025"), Some(1.0));
        let b = flow(Some("11 Jun 2025"), Some(2.0));
        let c = flow(Some("12 Jun 2025"), Some(3.0));

        let after_b = merge_flow(&b, &a);
        let after_c = merge_flow(&c, &after_b);
        assert_eq!(after_c, c);

        let after_late_b = merge_flow(&b, &after_c);
        assert_eq!(after_late_b, c);
    }
}
