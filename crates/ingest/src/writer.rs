//! Batched record persistence.

use episearch_core::{Error, Record, RecordStore};

/// Records per storage batch.
const WRITE_BATCH: usize = 25;

/// Upsert all records in batches, aborting on the first failure.
pub async fn put_records(store: &dyn RecordStore, records: &[Record]) -> Result<(), Error> {
    for chunk in records.chunks(WRITE_BATCH) {
        for record in chunk {
            tracing::debug!(number = %record.number, line = record.line, "putting record");
        }
        store.batch_put(chunk).await?;
    }
    Ok(())
}
