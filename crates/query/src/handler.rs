//! Query orchestration.
//!
//! Validates the request, builds the conjunctive filter, scans the archive
//! to exhaustion, sorts and serializes the result, and writes it through
//! the size-bounded cache.

use episearch_core::{BlobStore, Error, RecordStore};

use crate::{cache, filter, respond, scan};

/// Parameters of one query request.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub work_id: u64,
    /// Raw comma-separated search terms.
    pub words: String,
}

/// Answer one query, returning the serialized response body.
pub async fn handle_query(
    store: &dyn RecordStore, blobs: &dyn BlobStore, page_size: usize, params: &QueryParams,
) -> Result<String, Error> {
    if params.words.is_empty() {
        return Err(Error::MissingParameter("words"));
    }
    if params.work_id == 0 {
        return Err(Error::MissingParameter("work_id"));
    }

    tracing::info!(work_id = params.work_id, words = %params.words, "query");

    let words: Vec<&str> = params.words.split(',').collect();
    let filter = filter::build_filter(params.work_id, &words)?;
    let records = scan::scan_all(store, &filter, page_size).await?;
    let body = respond::serialize_sorted(records)?;

    cache::write_through(blobs, params.work_id, &params.words, body.as_bytes()).await?;

    Ok(body)
}
