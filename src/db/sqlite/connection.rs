//! SQLite connection utilities

use rusqlite::Connection;
use std::path::Path;

/// WAL keeps readers unblocked during the collector's writes; FULL sync makes
/// every committed insert durable before `execute` returns.
const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;";

/// Open a file-backed connection with the store's pragmas applied
pub fn create_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(CONNECTION_PRAGMAS)?;
    Ok(conn)
}

/// Open a private in-memory connection
pub fn create_memory_connection() -> rusqlite::Result<Connection> {
    Connection::open_in_memory()
}
