//! Collector Service
//!
//! Runs one collection cycle: fetch every tracked index and append each
//! successful quote to the store. Called by the scheduler and the CLI.

use crate::config::TrackedIndex;
use crate::db::sqlite::SqliteDb;
use crate::error::Result;
use crate::providers::{check_price, QuoteSource};
use crate::services::status_service::format_price;
use crate::state::AppState;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outcome for a single tracked index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Quote fetched; `id` is the stored row, or `None` when nothing was stored
    Collected { id: Option<i64>, price: f64 },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexOutcome {
    pub name: String,
    pub ticker: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl IndexOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Collected { .. })
    }
}

/// Summary of one collection cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<IndexOutcome>,
}

impl CollectionReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Collector service for business logic
pub struct CollectorService;

impl CollectorService {
    /// Run one collection cycle over the configured indices
    pub async fn run(state: &AppState) -> Result<CollectionReport> {
        Self::collect(
            &state.sqlite,
            state.quotes.as_ref(),
            &state.config.indices,
            &state.config.provider.range,
        )
        .await
    }

    /// Fetch every index and store the successes.
    ///
    /// A provider failure is recorded for that index and the cycle moves on.
    /// A storage failure ends the cycle with an error.
    pub async fn collect(
        db: &SqliteDb,
        source: &dyn QuoteSource,
        indices: &[TrackedIndex],
        range: &str,
    ) -> Result<CollectionReport> {
        let started_at = Utc::now();
        info!("Collection started ({} indices)", indices.len());

        let mut outcomes = Vec::with_capacity(indices.len());

        for index in indices {
            let status = match Self::fetch_price(source, index, range).await {
                Ok(price) => {
                    let collected_at = Local::now().naive_local();
                    let id = db.insert_observation(&index.name, &index.ticker, price, &collected_at)?;
                    info!("  ✓ {}: {}", index.name, format_price(price));
                    OutcomeStatus::Collected { id: Some(id), price }
                }
                Err(e) => {
                    warn!("  ✗ {} failed: {}", index.name, e);
                    OutcomeStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            outcomes.push(IndexOutcome {
                name: index.name.clone(),
                ticker: index.ticker.clone(),
                status,
            });
        }

        let report = CollectionReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        info!(
            "Collection finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );

        Ok(report)
    }

    /// Fetch every index without touching the store
    pub async fn fetch_only(
        source: &dyn QuoteSource,
        indices: &[TrackedIndex],
        range: &str,
    ) -> CollectionReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(indices.len());

        for index in indices {
            let status = match Self::fetch_price(source, index, range).await {
                Ok(price) => OutcomeStatus::Collected { id: None, price },
                Err(e) => OutcomeStatus::Failed {
                    reason: e.to_string(),
                },
            };

            outcomes.push(IndexOutcome {
                name: index.name.clone(),
                ticker: index.ticker.clone(),
                status,
            });
        }

        CollectionReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        }
    }

    async fn fetch_price(source: &dyn QuoteSource, index: &TrackedIndex, range: &str) -> Result<f64> {
        let price = source.fetch_latest_close(&index.ticker, range).await?;
        check_price(&index.ticker, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_indices;
    use crate::db::sqlite::format_timestamp;
    use crate::providers::scripted::ScriptedSource;
    use chrono::Duration;
    use rusqlite::{params, Connection};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        let db = SqliteDb::open_in_memory().unwrap();
        let source = ScriptedSource::new()
            .with_price("^KS11", 2500.5)
            .with_failure("^KQ11", "connection reset")
            .with_price("^KS200", 335.25);

        let report = CollectorService::collect(&db, &source, &default_indices(), "1d")
            .await
            .unwrap();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_complete_success());
        assert_eq!(db.count_total().unwrap(), 2);
        assert_eq!(source.calls(), vec!["^KS11", "^KQ11", "^KS200"]);

        let failed = &report.outcomes[1];
        assert_eq!(failed.name, "KOSDAQ");
        assert!(matches!(&failed.status, OutcomeStatus::Failed { reason } if reason.contains("connection reset")));
    }

    #[tokio::test]
    async fn test_collected_rows_match_report() {
        let db = SqliteDb::open_in_memory().unwrap();
        let source = ScriptedSource::new()
            .with_price("^KS11", 2500.5)
            .with_price("^KQ11", 850.0)
            .with_price("^KS200", 335.25);

        let report = CollectorService::collect(&db, &source, &default_indices(), "1d")
            .await
            .unwrap();
        assert!(report.is_complete_success());

        let latest = db.latest_all().unwrap();
        assert_eq!(latest.len(), 3);
        for outcome in &report.outcomes {
            let OutcomeStatus::Collected { id, price } = &outcome.status else {
                panic!("expected success for {}", outcome.name);
            };
            let row = latest.iter().find(|o| o.name == outcome.name).unwrap();
            assert_eq!(Some(row.id), *id);
            assert_eq!(row.price, *price);
            assert_eq!(row.ticker, outcome.ticker);
        }
    }

    #[tokio::test]
    async fn test_implausible_price_is_recorded_as_failure() {
        let db = SqliteDb::open_in_memory().unwrap();
        let source = ScriptedSource::new()
            .with_price("^KS11", f64::NAN)
            .with_price("^KQ11", -5.0)
            .with_price("^KS200", 335.25);

        let report = CollectorService::collect(&db, &source, &default_indices(), "1d")
            .await
            .unwrap();

        assert_eq!(report.failed(), 2);
        assert_eq!(db.count_total().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_ends_cycle() {
        let db = SqliteDb::open_in_memory().unwrap();
        db.execute_batch("DROP TABLE indices").unwrap();
        let source = ScriptedSource::new()
            .with_price("^KS11", 2500.5)
            .with_price("^KQ11", 850.0);

        let result = CollectorService::collect(&db, &source, &default_indices(), "1d").await;

        assert!(matches!(result, Err(ref e) if e.is_storage_failure()));
        assert_eq!(source.calls(), vec!["^KS11"]);
    }

    #[tokio::test]
    async fn test_fetch_only_needs_no_store() {
        let source = ScriptedSource::new().with_price("^KS11", 2500.5);

        let report = CollectorService::fetch_only(&source, &default_indices(), "1d").await;

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(
            report.outcomes[0].status,
            OutcomeStatus::Collected { id: None, price: 2500.5 }
        );
        assert_eq!(source.calls(), vec!["^KS11", "^KQ11", "^KS200"]);
    }

    #[tokio::test]
    async fn test_new_rows_sort_after_rows_in_existing_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stock_data.db");

        // A database left by the earlier collector: no migrations table,
        // local wall-clock timestamps.
        let earlier = Local::now().naive_local() - Duration::minutes(1);
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE indices (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    ticker TEXT NOT NULL,
                    price REAL NOT NULL,
                    collected_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );",
            )
            .unwrap();
            conn.execute(
                "INSERT INTO indices (name, ticker, price, collected_at) VALUES (?1, ?2, ?3, ?4)",
                params!["KOSPI", "^KS11", 2500.5, format_timestamp(&earlier)],
            )
            .unwrap();
        }

        let db = SqliteDb::new(&path).unwrap();
        let source = ScriptedSource::new().with_price("^KS11", 2600.0);
        let indices = vec![TrackedIndex::new("KOSPI", "^KS11")];

        CollectorService::collect(&db, &source, &indices, "1d").await.unwrap();

        let latest = db.latest_all().unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].price, 2600.0);
        assert!(latest[0].collected_at > format_timestamp(&earlier));

        let history = db.history("KOSPI", 100).unwrap();
        let prices: Vec<f64> = history.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![2600.0, 2500.5]);
    }
}
