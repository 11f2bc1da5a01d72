//! Daily briefing job: fetch quotes, crypto, sentiment, and news, then
//! render the dated markdown report.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use marketbrief_core::data::{coingecko, news, sentiment, yahoo, HttpClient};
use marketbrief_core::domain::Quote;

use crate::config::BriefConfig;
use crate::reporting::{render_brief, write_markdown_report, BriefData};

pub struct BriefOptions {
    pub output_dir: PathBuf,
    pub timezone: Tz,
}

pub struct BriefOutcome {
    pub report_path: PathBuf,
    pub latest_path: PathBuf,
}

pub fn run(client: &HttpClient, config: &BriefConfig, opts: &BriefOptions) -> Result<BriefOutcome> {
    let now = Utc::now().with_timezone(&opts.timezone);

    let indices: Vec<Quote> = config
        .indices
        .iter()
        .map(|m| yahoo::chart_quote(client, &m.symbol, &m.label))
        .collect();
    let commodities: Vec<Quote> = config
        .commodities
        .iter()
        .map(|m| yahoo::chart_quote(client, &m.symbol, &m.label))
        .collect();
    let equities: Vec<Quote> = config
        .equities
        .iter()
        .map(|t| yahoo::chart_quote(client, t, t))
        .collect();

    let crypto_map = coingecko::spot_prices(client);
    let crypto: Vec<Quote> = coingecko::COINS
        .iter()
        .filter_map(|(_, ticker)| crypto_map.get(*ticker).cloned())
        .collect();

    let fear_greed = sentiment::fear_greed(client);
    let macro_news = news::search_feed(client, &config.macro_query, config.news_per_bucket);
    let crypto_news = news::search_feed(client, &config.crypto_query, config.news_per_bucket);

    let data = BriefData {
        generated_at: now.format("%Y-%m-%d %H:%M %Z").to_string(),
        indices: &indices,
        commodities: &commodities,
        equities: &equities,
        crypto: &crypto,
        macro_news: &macro_news,
        crypto_news: &crypto_news,
        fear_greed,
    };
    let doc = render_brief(&data);

    let stamp = now.format("%Y-%m-%d").to_string();
    let (report_path, latest_path) =
        write_markdown_report(&opts.output_dir, "daily_brief", &stamp, &doc)?;

    Ok(BriefOutcome {
        report_path,
        latest_path,
    })
}
