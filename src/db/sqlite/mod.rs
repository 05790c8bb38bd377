//! SQLite database module

pub mod models;
mod connection;
mod migrations;
mod indices;

use crate::error::Result;
use chrono::NaiveDateTime;
pub use indices::format_timestamp;
pub use models::{LatestObservation, Observation, StoreStats};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;

/// SQLite database wrapper
///
/// The connection sits behind a mutex, so the collector's writes are
/// serialized and a reader never sees a partially inserted row.
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Open (or create) the database file and ensure the schema exists
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = connection::create_connection(path)?;
        tracing::info!("Opened database at {:?}", path);
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = connection::create_memory_connection()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Create the schema if absent; safe to call any number of times
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== Write Methods ==========

    /// Append one observation and return its id
    pub fn insert_observation(
        &self,
        name: &str,
        ticker: &str,
        price: f64,
        collected_at: &NaiveDateTime,
    ) -> Result<i64> {
        let conn = self.conn.lock();
        indices::insert_observation(&conn, name, ticker, price, collected_at)
    }

    /// Append one observation stamped with the database's current local time
    pub fn insert_observation_now(&self, name: &str, ticker: &str, price: f64) -> Result<i64> {
        let conn = self.conn.lock();
        indices::insert_observation_now(&conn, name, ticker, price)
    }

    // ========== Read Methods ==========

    /// Latest observation per index, ordered by name
    pub fn latest_all(&self) -> Result<Vec<Observation>> {
        let conn = self.conn.lock();
        indices::latest_all(&conn)
    }

    /// Newest-first history for one index, at most `limit` rows
    pub fn history(&self, name: &str, limit: usize) -> Result<Vec<Observation>> {
        let conn = self.conn.lock();
        indices::history(&conn, name, limit)
    }

    /// Newest observations across all indices
    pub fn recent(&self, limit: usize) -> Result<Vec<Observation>> {
        let conn = self.conn.lock();
        indices::recent(&conn, limit)
    }

    pub fn count_total(&self) -> Result<i64> {
        let conn = self.conn.lock();
        indices::count_total(&conn)
    }

    pub fn count_by_name(&self) -> Result<BTreeMap<String, i64>> {
        let conn = self.conn.lock();
        indices::count_by_name(&conn)
    }

    /// Total and per-index counts from one consistent snapshot
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();
        indices::stats(&conn)
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(sql)?;
        Ok(())
    }
}
