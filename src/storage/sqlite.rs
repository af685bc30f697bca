//! SQLite storage implementation
//!
//! Batches are written inside one transaction with a prepared statement, so
//! a flush cycle's unvisited and visited rows land together or not at all.

use crate::storage::schema::initialize_schema;
use crate::storage::{Storage, StorageError, StorageResult, UrlRow};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and ensures the schema.
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better write throughput
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Counts stored rows, optionally restricted by visited flag.
    pub fn count_urls(&self, visited: Option<bool>) -> StorageResult<u64> {
        let count: i64 = match visited {
            Some(flag) => self.conn.query_row(
                "SELECT COUNT(*) FROM urls WHERE visited = ?1",
                params![flag],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))?,
        };
        Ok(count as u64)
    }

    /// Returns all stored URLs with the given visited flag, oldest first.
    pub fn urls_by_visited(&self, visited: bool) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM urls WHERE visited = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![visited], |row| row.get(0))?;
        let mut urls = Vec::new();
        for url in rows {
            urls.push(url?);
        }
        Ok(urls)
    }
}

impl Storage for SqliteStorage {
    fn persist_batch(&mut self, rows: &[UrlRow]) -> StorageResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO urls (url, visited) VALUES (?1, ?2)")?;
            for row in rows {
                stmt.execute(params![row.url, row.visited])?;
            }
        }
        tx.commit()?;

        tracing::debug!(rows = rows.len(), "persisted URL batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_and_count() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let batch = vec![
            UrlRow::visited("https://a.test/".to_string()),
            UrlRow::unvisited("https://b.test/".to_string()),
            UrlRow::unvisited("https://c.test/".to_string()),
        ];
        storage.persist_batch(&batch).unwrap();

        assert_eq!(storage.count_urls(None).unwrap(), 3);
        assert_eq!(storage.count_urls(Some(true)).unwrap(), 1);
        assert_eq!(storage.count_urls(Some(false)).unwrap(), 2);
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.persist_batch(&[]).unwrap();
        assert_eq!(storage.count_urls(None).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_urls_each_get_a_row() {
        // Re-discovery is recorded every time; the schema does not dedup
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let batch = vec![
            UrlRow::unvisited("https://a.test/".to_string()),
            UrlRow::unvisited("https://a.test/".to_string()),
        ];
        storage.persist_batch(&batch).unwrap();
        assert_eq!(storage.count_urls(Some(false)).unwrap(), 2);
    }

    #[test]
    fn test_urls_by_visited_preserves_insert_order() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .persist_batch(&[
                UrlRow::unvisited("https://first.test/".to_string()),
                UrlRow::unvisited("https://second.test/".to_string()),
                UrlRow::visited("https://third.test/".to_string()),
            ])
            .unwrap();

        assert_eq!(
            storage.urls_by_visited(false).unwrap(),
            vec!["https://first.test/", "https://second.test/"]
        );
        assert_eq!(
            storage.urls_by_visited(true).unwrap(),
            vec!["https://third.test/"]
        );
    }

    #[test]
    fn test_persist_to_file_backed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trawl.db");

        {
            let mut storage = SqliteStorage::new(&path).unwrap();
            storage
                .persist_batch(&[UrlRow::visited("https://a.test/".to_string())])
                .unwrap();
        }

        // Reopen and verify the row survived
        let storage = SqliteStorage::new(&path).unwrap();
        assert_eq!(storage.count_urls(Some(true)).unwrap(), 1);
    }
}
