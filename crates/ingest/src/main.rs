//! Ingestion entry point.
//!
//! Crawls each configured work, refreshes the newest slice of its episodes
//! in the archive, then purges the query response cache. Logging goes to
//! stderr.

use anyhow::Result;
use clap::Parser;
use episearch_client::{FetchClient, FetchConfig};
use episearch_core::StoreDb;
use episearch_core::config::AppConfig;
use tracing_subscriber::EnvFilter;

mod pipeline;
mod slicer;
mod writer;

#[derive(Parser)]
#[command(name = "episearch-ingest")]
#[command(about = "Crawl configured works and refresh the episode archive")]
#[command(version)]
struct Cli {
    /// Percentage of each work's newest episodes to re-ingest.
    #[arg(long)]
    target_rate: Option<u8>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(rate) = cli.target_rate {
        config.target_rate = rate;
        config.validate()?;
    }
    config.require_work_urls()?;

    let store = StoreDb::open(&config.db_path).await?;
    let fetcher = FetchClient::new(FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        timeout: config.timeout(),
        respect_robots: config.respect_robots,
        ..FetchConfig::default()
    })?;

    pipeline::run(&store, &store, &fetcher, &config).await?;

    Ok(())
}
