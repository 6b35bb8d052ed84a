//! Query entry point.
//!
//! Answers one conjunctive full-text query against the archive and prints
//! the serialized response to stdout. Logging goes to stderr to keep the
//! payload clean.

use anyhow::Result;
use clap::Parser;
use episearch_core::StoreDb;
use episearch_core::config::AppConfig;
use tracing_subscriber::EnvFilter;

mod cache;
mod filter;
mod handler;
mod respond;
mod scan;

#[derive(Parser)]
#[command(name = "episearch-query")]
#[command(about = "Full-text search over the episode archive")]
#[command(version)]
struct Cli {
    /// Work to search within.
    #[arg(long)]
    work_id: u64,

    /// Comma-separated search terms; every term must match.
    #[arg(long)]
    words: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let store = StoreDb::open(&config.db_path).await?;

    let params = handler::QueryParams { work_id: cli.work_id, words: cli.words };
    match handler::handle_query(&store, &store, config.scan_page_size, &params).await {
        Ok(body) => println!("{body}"),
        Err(err) => {
            tracing::error!(status = err.status_code(), "{err}");
            std::process::exit(1);
        }
    }

    Ok(())
}
