//! Ingestion pipeline: sidebar crawl, episode fetch, record persistence.
//!
//! Works are processed one at a time and episodes one at a time, with a
//! fixed pause between episode fetches. Any failure aborts the whole run;
//! there is no per-episode retry or skip.

use std::time::Duration;

use episearch_client::fetch::PageSource;
use episearch_client::{body, sidebar};
use episearch_core::config::AppConfig;
use episearch_core::{BlobStore, Episode, Error, Record, RecordStore};
use scraper::Html;

use crate::{slicer, writer};

/// Prefix under which query responses are cached.
const CACHE_PREFIX: &str = "cache/";

/// Ingest every configured work, then purge the response cache.
///
/// The purge deliberately sweeps the whole `cache/` namespace rather than
/// only the works that changed.
pub async fn run(
    store: &dyn RecordStore, blobs: &dyn BlobStore, pages: &dyn PageSource, config: &AppConfig,
) -> Result<(), Error> {
    for url in &config.work_urls {
        ingest_work(store, pages, url, config).await?;
    }

    let purged = blobs.delete_prefix(CACHE_PREFIX).await?;
    tracing::info!(purged, "cache namespace purged");

    Ok(())
}

async fn ingest_work(
    store: &dyn RecordStore, pages: &dyn PageSource, url: &str, config: &AppConfig,
) -> Result<(), Error> {
    let sidebar_html = pages.page(&format!("{url}/episode_sidebar")).await?;
    let episodes = sidebar::extract_episodes(&sidebar_html)?;
    let picked = slicer::newest_slice(&episodes, config.target_rate);

    tracing::info!(url, total = episodes.len(), selected = picked.len(), "ingesting work");

    let records = build_records(pages, &episode_base(url), picked, config.fetch_delay()).await?;
    writer::put_records(store, &records).await
}

/// Base URL for episode pages: the work URL truncated at `/episodes/`.
fn episode_base(url: &str) -> String {
    let root = url.split("/episodes/").next().unwrap_or(url);
    format!("{root}/episodes/")
}

/// Fetch the selected episodes and flatten them into records.
///
/// Blank lines are dropped here, before anything reaches storage.
async fn build_records(
    pages: &dyn PageSource, base: &str, episodes: &[Episode], delay: Duration,
) -> Result<Vec<Record>, Error> {
    let mut records = Vec::new();
    for episode in episodes {
        // Throttle before the fetch; the wait applies even when the fetch
        // fails.
        tokio::time::sleep(delay).await;
        tracing::info!(number = %episode.number, "processing episode");

        let html = pages.page(&format!("{base}{}", episode.episode_id)).await?;
        let doc = Html::parse_document(&html);
        for line in body::body_lines(&doc)? {
            if line.body.trim().is_empty() {
                continue;
            }
            records.push(Record::from_parts(episode, line));
        }
    }
    Ok(records)
}
