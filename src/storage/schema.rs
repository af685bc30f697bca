//! Database schema definition
//!
//! A single `urls` table records everything the crawler learns: one row per
//! discovery, flagged visited or not. The same URL may appear many times,
//! once per discovery; deduplication is deliberately not a schema concern.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    visited INTEGER NOT NULL,
    recorded_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_urls_visited ON urls(visited);
"#;

/// Initializes the database schema. Idempotent.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
