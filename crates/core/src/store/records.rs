//! Record scan and upsert operations on the SQLite backend.

use super::connection::StoreDb;
use super::filter::FilterExpr;
use super::{RecordStore, ScanKey, ScanPage};
use crate::Error;
use crate::record::Record;
use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;
use tokio_rusqlite::rusqlite::types::Value;

#[async_trait]
impl RecordStore for StoreDb {
    /// One page of matching records in primary-key order.
    ///
    /// The filter compiles to the SQL predicate, so matching happens inside
    /// the storage engine. A continuation key is returned whenever a full
    /// page came back, which can yield one empty terminal page — callers
    /// stop on the absent key, not on an empty page.
    async fn scan(
        &self, filter: &FilterExpr, exclusive_start: Option<ScanKey>, limit: usize,
    ) -> Result<ScanPage, Error> {
        let (filter_sql, mut values) = filter.to_sql();

        let mut sql =
            format!("SELECT work_id, sub_title, number, episode_id, line, body FROM records WHERE {filter_sql}");
        if let Some(key) = exclusive_start {
            sql.push_str(" AND (work_id, episode_id, line) > (?, ?, ?)");
            values.push(Value::Integer(key.work_id as i64));
            values.push(Value::Integer(key.episode_id as i64));
            values.push(Value::Integer(i64::from(key.line)));
        }
        sql.push_str(" ORDER BY work_id, episode_id, line LIMIT ?");
        values.push(Value::Integer(limit as i64));

        self.conn
            .call(move |conn| -> Result<ScanPage, Error> {
                let mut stmt = conn.prepare(&sql)?;
                let mut rows = stmt.query(rusqlite::params_from_iter(values))?;

                let mut items = Vec::new();
                while let Some(row) = rows.next()? {
                    items.push(Record {
                        work_id: row.get::<_, i64>(0)? as u64,
                        sub_title: row.get(1)?,
                        number: row.get(2)?,
                        episode_id: row.get::<_, i64>(3)? as u64,
                        line: row.get(4)?,
                        body: row.get(5)?,
                    });
                }

                let last_key = if items.len() == limit { items.last().map(Record::key) } else { None };

                Ok(ScanPage { items, last_key })
            })
            .await
            .map_err(Error::from)
    }

    /// Upsert a batch of records in one transaction.
    ///
    /// A failure on any item rolls back the whole batch and surfaces as a
    /// persistence error; nothing is silently dropped.
    async fn batch_put(&self, records: &[Record]) -> Result<(), Error> {
        let records = records.to_vec();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO records (work_id, sub_title, number, episode_id, line, body)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                        ON CONFLICT(work_id, episode_id, line) DO UPDATE SET
                            sub_title = excluded.sub_title,
                            number = excluded.number,
                            body = excluded.body",
                    )?;
                    for record in &records {
                        stmt.execute(params![
                            record.work_id as i64,
                            record.sub_title,
                            record.number,
                            record.episode_id as i64,
                            record.line,
                            record.body,
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(work_id: u64, episode_id: u64, line: u32, body: &str) -> Record {
        Record {
            work_id,
            sub_title: "Chapter".to_string(),
            number: "1".to_string(),
            episode_id,
            line,
            body: body.to_string(),
        }
    }

    async fn scan_once(db: &StoreDb, filter: &FilterExpr) -> ScanPage {
        db.scan(filter, None, 100).await.unwrap()
    }

    #[tokio::test]
    async fn test_batch_put_and_scan() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.batch_put(&[
            make_record(1, 10, 1, "first line"),
            make_record(1, 10, 2, "second line"),
        ])
        .await
        .unwrap();

        let page = scan_once(&db, &FilterExpr::eq("work_id", 1)).await;
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].body, "first line");
        assert!(page.last_key.is_none());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_primary_key() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.batch_put(&[make_record(1, 10, 1, "old body")]).await.unwrap();
        db.batch_put(&[make_record(1, 10, 1, "new body")]).await.unwrap();

        let page = scan_once(&db, &FilterExpr::eq("work_id", 1)).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].body, "new body");
    }

    #[tokio::test]
    async fn test_reingest_is_idempotent() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let batch = vec![
            make_record(1, 10, 1, "a"),
            make_record(1, 10, 2, "b"),
            make_record(1, 11, 1, "c"),
        ];
        db.batch_put(&batch).await.unwrap();
        db.batch_put(&batch).await.unwrap();

        let page = scan_once(&db, &FilterExpr::eq("work_id", 1)).await;
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn test_contains_filter_narrows() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.batch_put(&[
            make_record(1, 10, 1, "red apple"),
            make_record(1, 10, 2, "green pear"),
            make_record(2, 20, 1, "red apple elsewhere"),
        ])
        .await
        .unwrap();

        let filter = FilterExpr::contains("body", "apple").and(FilterExpr::eq("work_id", 1));
        let page = scan_once(&db, &filter).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].line, 1);
    }

    #[tokio::test]
    async fn test_scan_paginates_with_continuation_key() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.batch_put(&[
            make_record(1, 10, 1, "a"),
            make_record(1, 10, 2, "b"),
            make_record(1, 11, 1, "c"),
        ])
        .await
        .unwrap();

        let filter = FilterExpr::eq("work_id", 1);
        let mut cursor = None;
        let mut seen = Vec::new();
        loop {
            let page = db.scan(&filter, cursor, 1).await.unwrap();
            seen.extend(page.items);
            match page.last_key {
                Some(key) => cursor = Some(key),
                None => break,
            }
        }

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].key(), ScanKey { work_id: 1, episode_id: 10, line: 1 });
        assert_eq!(seen[2].key(), ScanKey { work_id: 1, episode_id: 11, line: 1 });
    }

    #[tokio::test]
    async fn test_scan_empty_terminal_page() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.batch_put(&[make_record(1, 10, 1, "a"), make_record(1, 10, 2, "b")])
            .await
            .unwrap();

        let filter = FilterExpr::eq("work_id", 1);
        let first = db.scan(&filter, None, 2).await.unwrap();
        assert_eq!(first.items.len(), 2);
        let key = first.last_key.expect("full page carries a continuation key");

        let second = db.scan(&filter, Some(key), 2).await.unwrap();
        assert!(second.items.is_empty());
        assert!(second.last_key.is_none());
    }
}
