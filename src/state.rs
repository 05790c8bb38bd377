//! Application state management

use crate::config::AppConfig;
use crate::db::sqlite::SqliteDb;
use crate::error::Result;
use crate::providers::{QuoteSource, YahooChartSource};
use std::sync::Arc;

/// Application state shared by the scheduler and the API server
///
/// The store is the only resource both sides touch; everything else is
/// read-only after startup.
pub struct AppState {
    /// SQLite time-series store
    pub sqlite: Arc<SqliteDb>,

    /// Quote provider used by the collector
    pub quotes: Arc<dyn QuoteSource>,

    /// Configuration read at startup
    pub config: AppConfig,
}

impl AppState {
    /// Create new application state from configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let sqlite = Arc::new(SqliteDb::new(&config.database_path)?);
        let quotes: Arc<dyn QuoteSource> = Arc::new(YahooChartSource::new(&config.provider)?);

        tracing::info!(
            "Tracking {} indices via {}",
            config.indices.len(),
            quotes.id()
        );

        Ok(Self::from_parts(config, sqlite, quotes))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(config: AppConfig, sqlite: Arc<SqliteDb>, quotes: Arc<dyn QuoteSource>) -> Self {
        Self {
            sqlite,
            quotes,
            config,
        }
    }
}
