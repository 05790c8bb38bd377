//! Query Service
//!
//! Read-only access to the stored time series for the API layer.

use crate::db::sqlite::{LatestObservation, Observation, StoreStats};
use crate::error::Result;
use crate::state::AppState;

/// Query service for business logic
pub struct QueryService;

impl QueryService {
    /// Latest observation for every index that has one
    pub fn latest_all(state: &AppState) -> Result<Vec<LatestObservation>> {
        let rows = state.sqlite.latest_all()?;
        Ok(rows.into_iter().map(LatestObservation::from).collect())
    }

    /// Newest-first history for one index, capped at the configured limit
    pub fn history(state: &AppState, name: &str) -> Result<Vec<Observation>> {
        state.sqlite.history(name, state.config.history_limit)
    }

    /// Total and per-index record counts
    pub fn stats(state: &AppState) -> Result<StoreStats> {
        state.sqlite.stats()
    }

    /// Newest observations across all indices
    pub fn recent(state: &AppState, limit: usize) -> Result<Vec<Observation>> {
        state.sqlite.recent(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::sqlite::SqliteDb;
    use crate::error::AppError;
    use crate::providers::scripted::ScriptedSource;
    use chrono::{Duration, Local, NaiveDate};
    use std::sync::Arc;

    fn state_with_limit(limit: usize) -> AppState {
        let config = AppConfig {
            history_limit: limit,
            ..AppConfig::default()
        };
        AppState::from_parts(
            config,
            Arc::new(SqliteDb::open_in_memory().unwrap()),
            Arc::new(ScriptedSource::new()),
        )
    }

    #[test]
    fn test_history_respects_configured_limit() {
        let state = state_with_limit(3);
        let base = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        for i in 0..5 {
            state
                .sqlite
                .insert_observation("KOSPI", "^KS11", 2500.0 + i as f64, &(base + Duration::minutes(i)))
                .unwrap();
        }

        let rows = QueryService::history(&state, "KOSPI").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].price, 2504.0);
    }

    #[test]
    fn test_history_missing_index() {
        let state = state_with_limit(100);
        assert!(matches!(
            QueryService::history(&state, "KOSPI"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_stats_total_matches_breakdown() {
        let state = state_with_limit(100);
        let now = Local::now().naive_local();
        state.sqlite.insert_observation("KOSPI", "^KS11", 2500.0, &now).unwrap();
        state.sqlite.insert_observation("KOSDAQ", "^KQ11", 850.0, &now).unwrap();
        state.sqlite.insert_observation("KOSDAQ", "^KQ11", 851.0, &now).unwrap();

        let stats = QueryService::stats(&state).unwrap();
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.by_index.values().sum::<i64>(), 3);

        let latest = QueryService::latest_all(&state).unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].name, "KOSDAQ");
        assert_eq!(latest[0].price, 851.0);
    }
}
