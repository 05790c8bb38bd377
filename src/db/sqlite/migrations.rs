//! SQLite schema setup
//!
//! Every statement is create-if-absent, so running this against an existing
//! database never drops or rewrites stored observations.

use crate::error::Result;
use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    run_migration(conn, "001_indices", CREATE_INDICES_TABLE)?;
    run_migration(conn, "002_indices_name_collected_at", CREATE_INDICES_NAME_INDEX)?;

    tracing::debug!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

// AUTOINCREMENT guarantees ids are never reused. `collected_at` is local
// wall-clock time, matching rows written into existing databases.
const CREATE_INDICES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS indices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    ticker TEXT NOT NULL,
    price REAL NOT NULL,
    collected_at TIMESTAMP NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now', 'localtime'))
);
"#;

const CREATE_INDICES_NAME_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_indices_name_collected_at ON indices (name, collected_at);
"#;
