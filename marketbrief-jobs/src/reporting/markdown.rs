//! Daily briefing markdown renderer.

use marketbrief_core::domain::{NewsItem, Quote, QuoteSource};
use marketbrief_core::fmt::{fmt_pct, fmt_price};
use marketbrief_core::score::{
    direction_score, net_bias, sentiment_score, volatility_score, Stance,
};

/// Everything the briefing needs, already fetched. Quote lists keep their
/// configured display order; lookups by label degrade to unknown quotes so
/// a renamed config entry cannot panic the renderer.
pub struct BriefData<'a> {
    /// Preformatted run timestamp, e.g. `2025-06-17 09:30 KST`.
    pub generated_at: String,
    pub indices: &'a [Quote],
    pub commodities: &'a [Quote],
    pub equities: &'a [Quote],
    pub crypto: &'a [Quote],
    pub macro_news: &'a [NewsItem],
    pub crypto_news: &'a [NewsItem],
    pub fear_greed: Option<f64>,
}

fn find(quotes: &[Quote], label: &str) -> Quote {
    quotes
        .iter()
        .find(|q| q.symbol == label)
        .cloned()
        .unwrap_or_else(|| Quote::unknown(label, QuoteSource::Yahoo))
}

fn quote_row(out: &mut String, q: &Quote) {
    out.push_str(&format!(
        "| {} | {} | {} |\n",
        q.symbol,
        fmt_price(q.price, 2),
        fmt_pct(q.change_pct)
    ));
}

fn news_lines(out: &mut String, tag: &str, items: &[NewsItem]) {
    if items.is_empty() {
        out.push_str(&format!("- [{tag}] feed unavailable\n"));
        return;
    }
    for n in items {
        let when: &str = if n.pub_date.is_empty() {
            "n/a"
        } else {
            n.pub_date.as_str()
        };
        out.push_str(&format!("- [{tag}] {} ({when})\n", n.title));
    }
}

/// Render the full daily briefing document.
pub fn render_brief(data: &BriefData<'_>) -> String {
    let spx = find(data.indices, "S&P500");
    let ndx = find(data.indices, "NASDAQ");
    let dxy = find(data.indices, "DXY");
    let us10y = find(data.indices, "US10Y");
    let vix = find(data.indices, "VIX");
    let btc = find(data.crypto, "BTC");
    let eth = find(data.crypto, "ETH");

    let direction = direction_score(spx.change_pct, ndx.change_pct, dxy.change_pct);
    let volatility = volatility_score(vix.change_pct, eth.change_pct);
    let sentiment = sentiment_score(data.fear_greed);
    let bias = net_bias(direction, volatility, sentiment);
    let stance = Stance::from_net_bias(bias);

    let focus_event = data
        .macro_news
        .first()
        .map(|n| n.title.as_str())
        .unwrap_or("n/a");

    let mut out = String::new();
    out.push_str(&format!("# Daily Macro Briefing ({})\n\n", data.generated_at));
    out.push_str("Liquidity / rates / volatility snapshot across macro and crypto.\n");
    out.push_str("Basis: previous US regular-session close plus live crypto prices.\n\n");

    out.push_str("## Signal Scorecard\n");
    out.push_str(&format!(
        "- Direction: {direction:+} (S&P500 {} / NASDAQ {} / DXY {})\n",
        fmt_pct(spx.change_pct),
        fmt_pct(ndx.change_pct),
        fmt_pct(dxy.change_pct)
    ));
    out.push_str(&format!(
        "- Volatility: {volatility:+} (VIX {} / ETH 24h {})\n",
        fmt_pct(vix.change_pct),
        fmt_pct(eth.change_pct)
    ));
    out.push_str(&format!(
        "- Sentiment: {sentiment:+} (Fear-Greed {})\n",
        fmt_price(data.fear_greed, 0)
    ));
    out.push_str(&format!("- Net bias: {bias:+.2} — **{stance}**\n\n"));

    out.push_str("## Macro Focus\n");
    out.push_str(&format!("- Key event: {focus_event}\n"));
    news_lines(&mut out, "macro", data.macro_news);
    out.push_str("- Checkpoints:\n");
    out.push_str(&format!(
        "  - DXY trend: {} ({})\n",
        fmt_price(dxy.price, 2),
        fmt_pct(dxy.change_pct)
    ));
    out.push_str(&format!(
        "  - US10Y trend: {} ({})\n",
        fmt_price(us10y.price, 2),
        fmt_pct(us10y.change_pct)
    ));
    out.push_str(&format!(
        "  - VIX level: {} ({})\n\n",
        fmt_price(vix.price, 2),
        fmt_pct(vix.change_pct)
    ));

    out.push_str("## Market Wrap (previous US close)\n");
    out.push_str("| Item | Price | Change |\n");
    out.push_str("| --- | ---: | ---: |\n");
    for q in data.indices.iter().chain(data.commodities) {
        quote_row(&mut out, q);
    }
    out.push('\n');

    out.push_str("## Tech & Crypto Equity Proxy\n");
    out.push_str("| Ticker | Close | Change |\n");
    out.push_str("| --- | ---: | ---: |\n");
    for q in data.equities {
        quote_row(&mut out, q);
    }
    out.push('\n');

    out.push_str("## Crypto Snapshot (live)\n");
    for q in data.crypto {
        out.push_str(&format!(
            "- {}: {} / 24h {}\n",
            q.symbol,
            fmt_price(q.price, 2),
            fmt_pct(q.change_pct)
        ));
    }
    out.push('\n');

    out.push_str("## News → Trading\n");
    out.push_str("### Macro\n");
    news_lines(&mut out, "macro", data.macro_news);
    out.push_str("### Crypto\n");
    news_lines(&mut out, "crypto", data.crypto_news);
    out.push('\n');

    out.push_str("## Summary\n");
    out.push_str(&format!(
        "- Conclusion: {stance}. Range-aware positioning with conservative sizing.\n"
    ));
    out.push_str(&format!(
        "- Direction {direction:+}: re-check index/dollar alignment before adding exposure\n"
    ));
    out.push_str(&format!(
        "- Volatility {volatility:+}: VIX {} · ETH {}\n",
        fmt_pct(vix.change_pct),
        fmt_pct(eth.change_pct)
    ));
    out.push_str(&format!(
        "- Sentiment {sentiment:+}: Fear-Greed {}\n",
        fmt_price(data.fear_greed, 0)
    ));
    out.push_str(
        "- Invalidation: simultaneous DXY spike, VIX rebound, and broad crypto weakness\n\n",
    );

    out.push_str("---\n\n");
    out.push_str("## Raw Tables\n");
    out.push_str("### Crypto\n");
    out.push_str("| Asset | Price | 24h Change |\n");
    out.push_str("| --- | ---: | ---: |\n");
    for q in data.crypto {
        quote_row(&mut out, q);
    }
    out.push_str("### Links\n");
    for (bucket, items) in [("Macro", data.macro_news), ("Crypto", data.crypto_news)] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("- {bucket}:\n"));
        for n in items {
            out.push_str(&format!("  - [{}]({})\n", n.title, n.link));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(label: &str, price: f64, change: f64) -> Quote {
        Quote::new(label, Some(price), Some(change), QuoteSource::Yahoo)
    }

    fn sample_news(n: usize) -> Vec<NewsItem> {
        (0..n)
            .map(|i| NewsItem {
                title: format!("Headline {i}"),
                link: format!("https://example.com/{i}"),
                pub_date: "Tue, 17 Jun 2025 09:00:00 GMT".to_string(),
            })
            .collect()
    }

    fn sample_data<'a>(
        indices: &'a [Quote],
        crypto: &'a [Quote],
        news: &'a [NewsItem],
    ) -> BriefData<'a> {
        BriefData {
            generated_at: "2025-06-17 09:30 KST".to_string(),
            indices,
            commodities: &[],
            equities: &[],
            crypto,
            macro_news: news,
            crypto_news: &[],
            fear_greed: Some(75.0),
        }
    }

    #[test]
    fn scorecard_reflects_the_inputs() {
        let indices = vec![
            quote("S&P500", 6000.0, 1.2),
            quote("NASDAQ", 19500.0, 1.5),
            quote("DXY", 104.5, -0.3),
            quote("US10Y", 4.42, 0.5),
            quote("US2Y", 4.1, 0.2),
            quote("VIX", 17.0, -2.0),
        ];
        let crypto = vec![quote("BTC", 104000.0, 2.0), quote("ETH", 2500.0, 4.0)];
        let news = sample_news(2);
        let doc = render_brief(&sample_data(&indices, &crypto, &news));

        // direction +1, volatility clamps to +1, sentiment +1 → bias +1.00.
        assert!(doc.contains("- Direction: +1"));
        assert!(doc.contains("- Volatility: +1"));
        assert!(doc.contains("- Sentiment: +1 (Fear-Greed 75)"));
        assert!(doc.contains("- Net bias: +1.00 — **mild risk-on**"));
        assert!(doc.contains("- Key event: Headline 0"));
    }

    #[test]
    fn missing_quotes_render_as_na_without_panicking() {
        let doc = render_brief(&sample_data(&[], &[], &[]));
        assert!(doc.contains("(S&P500 n/a / NASDAQ n/a / DXY n/a)"));
        assert!(doc.contains("- [macro] feed unavailable"));
        // No direction inputs, greed 75: bias = (0 + 0 + 1) / 3.
        assert!(doc.contains("- Net bias: +0.33 — **mild risk-on**"));
    }

    #[test]
    fn tables_list_quotes_in_given_order() {
        let indices = vec![quote("S&P500", 6000.0, 1.2), quote("NASDAQ", 19500.0, 1.5)];
        let doc = render_brief(&sample_data(&indices, &[], &[]));
        let spx = doc.find("| S&P500 | 6,000.00 | +1.20% |").unwrap();
        let ndx = doc.find("| NASDAQ | 19,500.00 | +1.50% |").unwrap();
        assert!(spx < ndx);
    }
}
