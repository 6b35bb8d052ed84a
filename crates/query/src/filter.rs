//! Conjunctive filter construction.

use episearch_core::{Error, FilterExpr};

/// Build the scan filter for a query: every word must appear somewhere in
/// the body, and the record must belong to the queried work.
///
/// An empty-string word (a trailing comma in the raw input) becomes a
/// trivially-true clause rather than a validation error.
pub fn build_filter(work_id: u64, words: &[&str]) -> Result<FilterExpr, Error> {
    words
        .iter()
        .map(|word| FilterExpr::contains("body", *word))
        .reduce(FilterExpr::and)
        .map(|conjunction| conjunction.and(FilterExpr::eq("work_id", work_id)))
        .ok_or(Error::MissingParameter("words"))
}
