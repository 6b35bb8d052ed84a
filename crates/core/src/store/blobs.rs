//! Blob operations for cached query responses.

use super::BlobStore;
use super::connection::StoreDb;
use crate::Error;
use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

#[async_trait]
impl BlobStore for StoreDb {
    /// Insert or replace a blob at `key`.
    async fn put_object(&self, key: &str, body: &[u8]) -> Result<(), Error> {
        let key = key.to_string();
        let body = body.to_vec();
        let put_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache_objects (key, body, put_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        body = excluded.body,
                        put_at = excluded.put_at",
                    params![key, body, put_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a blob by key. Returns None if the key doesn't exist.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Vec<u8>>, Error> {
                let mut stmt = conn.prepare("SELECT body FROM cache_objects WHERE key = ?1")?;

                let result = stmt.query_row(params![key], |row| row.get(0));

                match result {
                    Ok(body) => Ok(Some(body)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every blob whose key starts with `prefix`.
    ///
    /// Returns the number of deleted entries.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64, Error> {
        let prefix = prefix.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cache_objects WHERE key LIKE ?1 || '%'", params![prefix])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.put_object("cache/1/abc.json", b"[1,2,3]").await.unwrap();

        let body = db.get_object("cache/1/abc.json").await.unwrap().unwrap();
        assert_eq!(body, b"[1,2,3]");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let result = db.get_object("cache/1/nope.json").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.put_object("cache/1/abc.json", b"old").await.unwrap();
        db.put_object("cache/1/abc.json", b"new").await.unwrap();

        let body = db.get_object("cache/1/abc.json").await.unwrap().unwrap();
        assert_eq!(body, b"new");
    }

    #[tokio::test]
    async fn test_delete_prefix_spans_works() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.put_object("cache/1/a.json", b"a").await.unwrap();
        db.put_object("cache/2/b.json", b"b").await.unwrap();
        db.put_object("exports/report.json", b"r").await.unwrap();

        let deleted = db.delete_prefix("cache/").await.unwrap();
        assert_eq!(deleted, 2);

        assert!(db.get_object("cache/1/a.json").await.unwrap().is_none());
        assert!(db.get_object("cache/2/b.json").await.unwrap().is_none());
        assert!(db.get_object("exports/report.json").await.unwrap().is_some());
    }
}
