//! SQLite database models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp layout for `collected_at`; fixed-width so text order matches time order
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One persisted quote row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: i64,
    pub name: String,
    pub ticker: String,
    pub price: f64,
    pub collected_at: String,
}

/// Latest observation for an index, as exposed by the latest-all query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestObservation {
    pub name: String,
    pub ticker: String,
    pub price: f64,
    pub collected_at: String,
}

impl From<Observation> for LatestObservation {
    fn from(obs: Observation) -> Self {
        Self {
            name: obs.name,
            ticker: obs.ticker,
            price: obs.price,
            collected_at: obs.collected_at,
        }
    }
}

/// Row counts over the whole table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_records: i64,
    pub by_index: BTreeMap<String, i64>,
}
