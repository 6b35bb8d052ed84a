//! Size-bounded write-through caching of query responses.

use episearch_core::hash::cache_object_key;
use episearch_core::{BlobStore, Error};

/// Responses at or above this size are not cached at all.
const CACHE_WRITE_MAX: usize = 50 * 1024 * 1024;

/// Hard ceiling on the synchronous response payload.
const RESPONSE_MAX: usize = 6 * 1024 * 1024 - 100;

/// Cache the serialized response, then enforce the response-size ceiling.
///
/// The ceiling check runs after the cache decision: a response between the
/// two limits is cached for out-of-band retrieval and still reported as too
/// large to the direct caller.
pub async fn write_through(blobs: &dyn BlobStore, work_id: u64, words: &str, body: &[u8]) -> Result<(), Error> {
    let size = body.len();
    tracing::info!(bytes = size, "serialized response");

    if size < CACHE_WRITE_MAX {
        blobs.put_object(&cache_object_key(work_id, words), body).await?;
    } else {
        tracing::warn!(bytes = size, "response too large to cache");
    }

    if size > RESPONSE_MAX {
        return Err(Error::ResponseTooLarge(size));
    }

    Ok(())
}
