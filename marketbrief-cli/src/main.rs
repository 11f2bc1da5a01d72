//! marketbrief CLI — scheduled dashboard snapshot jobs.
//!
//! Commands:
//! - `brief` — generate the dated daily markdown briefing plus its latest alias
//! - `news` — refresh `news.json` from the RSS topic feeds
//! - `etf` — refresh `etf.json` from the ETF flow pages
//! - `snapshot` — refresh the macro/stocks snapshot documents
//!
//! Data faults are absorbed inside the jobs (a dead source keeps the last
//! known values), so a non-zero exit means a filesystem or timezone fault.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use marketbrief_core::data::HttpClient;
use marketbrief_jobs::jobs::brief::{self, BriefOptions};
use marketbrief_jobs::jobs::snapshot::{self, SnapshotOptions};
use marketbrief_jobs::jobs::{etf, news};
use marketbrief_jobs::JobConfig;

#[derive(Parser)]
#[command(name = "marketbrief", about = "Market dashboard snapshot jobs")]
struct Cli {
    /// TOML config overriding the built-in symbol and feed lists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the daily markdown briefing.
    Brief {
        /// Directory where reports are written.
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,

        /// IANA timezone for the report timestamp.
        #[arg(long, default_value = "Asia/Seoul")]
        timezone: String,
    },
    /// Refresh news.json from the RSS topic feeds.
    News {
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
    },
    /// Refresh etf.json from the ETF flow pages.
    Etf {
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
    },
    /// Refresh the macro/stocks snapshot documents.
    Snapshot {
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,

        /// IANA timezone for the as-of stamp.
        #[arg(long, default_value = "Asia/Seoul")]
        timezone: String,

        /// Optional mirror directory for the macro snapshot.
        #[arg(long)]
        mirror_dir: Option<PathBuf>,
    },
}

fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow!("unknown timezone '{name}'"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => JobConfig::from_file(path)?,
        None => JobConfig::default(),
    };
    let client = HttpClient::new();

    match cli.command {
        Commands::Brief {
            output_dir,
            timezone,
        } => {
            let opts = BriefOptions {
                output_dir,
                timezone: parse_timezone(&timezone)?,
            };
            let outcome = brief::run(&client, &config.brief, &opts)?;
            println!("Wrote {}", outcome.report_path.display());
            println!("Updated {}", outcome.latest_path.display());
        }
        Commands::News { output_dir } => {
            let path = news::run(&client, &config.news, &output_dir)?;
            println!("Updated {}", path.display());
        }
        Commands::Etf { output_dir } => {
            let path = etf::run(&client, &config.etf, &output_dir)?;
            println!("Updated {}", path.display());
        }
        Commands::Snapshot {
            output_dir,
            timezone,
            mirror_dir,
        } => {
            let opts = SnapshotOptions {
                output_dir,
                mirror_dir,
                timezone: parse_timezone(&timezone)?,
            };
            let outcome = snapshot::run(&client, &config.snapshot, &opts)?;
            println!("Updated {}", outcome.macro_path.display());
            println!("Updated {}", outcome.stocks_path.display());
            println!("Updated {}", outcome.board_path.display());
        }
    }

    Ok(())
}
