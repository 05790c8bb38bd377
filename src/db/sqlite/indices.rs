//! Index observation time series
//!
//! Append-only: rows are inserted by the collector and never updated or deleted.
//! Ordering is always `collected_at DESC, id DESC`, so rows sharing a timestamp
//! come back newest-insert first.

use super::models::{Observation, StoreStats, TIMESTAMP_FORMAT};
use crate::error::{AppError, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;

fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<Observation> {
    Ok(Observation {
        id: row.get(0)?,
        name: row.get(1)?,
        ticker: row.get(2)?,
        price: row.get(3)?,
        collected_at: row.get(4)?,
    })
}

// SQLite treats a negative LIMIT as unbounded, so clamp instead of wrapping.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Format a timestamp the way `collected_at` stores it
///
/// Values are wall-clock local time with no offset, the same text layout as
/// rows already present in an existing `stock_data.db`.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Append one observation with an explicit collection time
pub fn insert_observation(
    conn: &Connection,
    name: &str,
    ticker: &str,
    price: f64,
    collected_at: &NaiveDateTime,
) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO indices (name, ticker, price, collected_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![name, ticker, price, format_timestamp(collected_at)],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!("Inserted observation: id={}, name={}, price={}", id, name, price);

    Ok(id)
}

/// Append one observation, letting the column default stamp the insertion time
pub fn insert_observation_now(conn: &Connection, name: &str, ticker: &str, price: f64) -> Result<i64> {
    conn.execute(
        "INSERT INTO indices (name, ticker, price) VALUES (?1, ?2, ?3)",
        params![name, ticker, price],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Latest observation per name, ordered by name
pub fn latest_all(conn: &Connection) -> Result<Vec<Observation>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, name, ticker, price, collected_at
        FROM (
            SELECT id, name, ticker, price, collected_at,
                   ROW_NUMBER() OVER (
                       PARTITION BY name
                       ORDER BY collected_at DESC, id DESC
                   ) AS rn
            FROM indices
        )
        WHERE rn = 1
        ORDER BY name ASC
        "#,
    )?;

    let rows = stmt
        .query_map([], observation_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Most recent observations for one name, newest first
///
/// Returns `NotFound` when the name has no rows at all.
pub fn history(conn: &Connection, name: &str, limit: usize) -> Result<Vec<Observation>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, name, ticker, price, collected_at
        FROM indices
        WHERE name = ?1
        ORDER BY collected_at DESC, id DESC
        LIMIT ?2
        "#,
    )?;

    let rows = stmt
        .query_map(params![name, sql_limit(limit)], observation_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(AppError::NotFound(format!("No observations for index '{}'", name)));
    }

    Ok(rows)
}

/// Most recent observations across all names
pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<Observation>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, name, ticker, price, collected_at
        FROM indices
        ORDER BY collected_at DESC, id DESC
        LIMIT ?1
        "#,
    )?;

    let rows = stmt
        .query_map(params![sql_limit(limit)], observation_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Total number of stored observations
pub fn count_total(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM indices", [], |row| row.get(0))?;
    Ok(count)
}

/// Number of stored observations per name
pub fn count_by_name(conn: &Connection) -> Result<BTreeMap<String, i64>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT name, COUNT(*)
        FROM indices
        GROUP BY name
        ORDER BY name
        "#,
    )?;

    let counts = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;

    Ok(counts)
}

/// Both aggregates, read under the same connection lock
pub fn stats(conn: &Connection) -> Result<StoreStats> {
    Ok(StoreStats {
        total_records: count_total(conn)?,
        by_index: count_by_name(conn)?,
    })
}
