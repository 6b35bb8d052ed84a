//! Result ordering and serialization.

use episearch_core::{Error, Record, WireRecord};

/// Sort records by the composite episode/line key and serialize to JSON.
///
/// Every numeric field is emitted as its decimal string so consumers with
/// limited-precision number types keep the full 64-bit ids. Pure; the
/// caller decides what to do with the bytes.
pub fn serialize_sorted(mut records: Vec<Record>) -> Result<String, Error> {
    records.sort_by_key(Record::sort_key);
    let wire: Vec<WireRecord> = records.iter().map(WireRecord::from).collect();
    serde_json::to_string(&wire).map_err(|e| Error::Serialize(e.to_string()))
}
