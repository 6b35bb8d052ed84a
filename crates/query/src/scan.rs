//! Cursor-driven scan consumption.

use episearch_core::{Error, FilterExpr, Record, RecordStore, ScanKey};

/// Pull-based pager bound to one scan's filter and cursor chain.
///
/// Each call to [`next_page`](ScanPages::next_page) forwards the previous
/// response's continuation key; the scan terminates when a response carries
/// none. A fresh pager restarts the scan from the beginning.
pub struct ScanPages<'a> {
    store: &'a dyn RecordStore,
    filter: &'a FilterExpr,
    page_size: usize,
    cursor: Option<ScanKey>,
    exhausted: bool,
}

impl<'a> ScanPages<'a> {
    pub fn new(store: &'a dyn RecordStore, filter: &'a FilterExpr, page_size: usize) -> Self {
        Self { store, filter, page_size, cursor: None, exhausted: false }
    }

    /// Pull the next page, or None once the scan is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Record>>, Error> {
        if self.exhausted {
            return Ok(None);
        }

        let page = self.store.scan(self.filter, self.cursor.take(), self.page_size).await?;
        self.cursor = page.last_key;
        self.exhausted = self.cursor.is_none();

        Ok(Some(page.items))
    }
}

/// Drive the scan to exhaustion and materialize every matching record.
///
/// The result-set ordering key spans the whole set, so sorting cannot start
/// until the scan has finished. There is no upper bound on page count.
pub async fn scan_all(store: &dyn RecordStore, filter: &FilterExpr, page_size: usize) -> Result<Vec<Record>, Error> {
    let mut pages = ScanPages::new(store, filter, page_size);
    let mut records = Vec::new();
    while let Some(page) = pages.next_page().await? {
        records.extend(page);
    }
    Ok(records)
}
