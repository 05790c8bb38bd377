//! REST API response types

use crate::db::sqlite::StoreStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health check payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Record counts payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_records: i64,
    pub by_index: BTreeMap<String, i64>,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            total_records: stats.total_records,
            by_index: stats.by_index,
        }
    }
}
