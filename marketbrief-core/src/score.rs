//! Three-axis market bias heuristic.
//!
//! Fixed thresholds, not a configurable model — reimplementations must keep
//! the exact cut-offs so the rendered scorecard stays stable day over day.

use std::fmt;

/// Direction axis from index percent changes.
///
/// S&P 500 and NASDAQ each contribute their sign; the dollar index
/// contributes inverted (a rising dollar reads risk-off). Absent inputs
/// contribute nothing. The summed points collapse to -1/0/+1 with the
/// `> 1` / `< -1` cut.
pub fn direction_score(spx: Option<f64>, ndx: Option<f64>, dxy: Option<f64>) -> i32 {
    let mut points = 0;
    for change in [spx, ndx].into_iter().flatten() {
        points += if change > 0.0 { 1 } else { -1 };
    }
    if let Some(change) = dxy {
        points += if change > 0.0 { -1 } else { 1 };
    }

    if points > 1 {
        1
    } else if points < -1 {
        -1
    } else {
        0
    }
}

/// Volatility axis: falling VIX is calm (+1), rising VIX is stress (-1);
/// an ETH 24h move beyond ±3% adds a point. Clamped to [-1, 1].
pub fn volatility_score(vix_change: Option<f64>, eth_change_24h: Option<f64>) -> i32 {
    let mut points = 0;
    if let Some(change) = vix_change {
        points += if change < 0.0 { 1 } else { -1 };
    }
    if let Some(change) = eth_change_24h {
        if change.abs() > 3.0 {
            points += 1;
        }
    }
    points.clamp(-1, 1)
}

/// Sentiment axis from the fear-greed index: ≤ 30 is fear (-1),
/// ≥ 70 is greed (+1).
pub fn sentiment_score(fear_greed: Option<f64>) -> i32 {
    match fear_greed {
        Some(v) if v <= 30.0 => -1,
        Some(v) if v >= 70.0 => 1,
        Some(_) => 0,
        None => 0,
    }
}

/// Mean of the three axis scores, in [-1, 1].
pub fn net_bias(direction: i32, volatility: i32, sentiment: i32) -> f64 {
    f64::from(direction + volatility + sentiment) / 3.0
}

/// Overall stance implied by the net bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    RiskOn,
    RiskOff,
    Neutral,
}

impl Stance {
    pub fn from_net_bias(net_bias: f64) -> Self {
        if net_bias > 0.3 {
            Stance::RiskOn
        } else if net_bias < -0.3 {
            Stance::RiskOff
        } else {
            Stance::Neutral
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stance::RiskOn => "mild risk-on",
            Stance::RiskOff => "mild risk-off",
            Stance::Neutral => "neutral/range",
        };
        f.write_str(label)
    }
}
