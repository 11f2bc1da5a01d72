//! Display formatting for metric and quote values.
//!
//! Every formatter degrades to a placeholder rather than failing: `"n/a"`
//! for quote-style values, an em dash for snapshot metric fields.

/// Placeholder used in `MetricField::display` when no value has ever been
/// observed for the field.
pub const PLACEHOLDER: &str = "—";

/// Format with a fixed number of decimals and thousands separators.
pub fn thousands(value: f64, digits: usize) -> String {
    let formatted = format!("{value:.digits$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits_str) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits_str.len() + digits_str.len() / 3);
    for (i, ch) in digits_str.chars().enumerate() {
        if i > 0 && (digits_str.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Rounded to a whole number with thousands separators.
pub fn fmt_int(value: f64) -> String {
    thousands(value.round(), 0)
}

pub fn fmt_2(value: f64) -> String {
    format!("{value:.2}")
}

pub fn fmt_3(value: f64) -> String {
    format!("{value:.3}")
}

/// Price for display: thousands-separated, or `"n/a"` when absent.
pub fn fmt_price(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) if !v.is_nan() => thousands(v, digits),
        _ => "n/a".to_string(),
    }
}

/// Signed percent change, or `"n/a"` when absent.
pub fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{v:+.2}%"),
        _ => "n/a".to_string(),
    }
}
