//! Cache object key generation for query responses.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of the raw comma-separated words string.
pub fn words_digest(words: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(words.as_bytes());
    hex::encode(hasher.finalize())
}

/// Blob key under which a query response is cached.
pub fn cache_object_key(work_id: u64, words: &str) -> String {
    format!("cache/{work_id}/{}.json", words_digest(words))
}
