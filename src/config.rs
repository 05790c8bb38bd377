//! Application configuration
//!
//! Loaded once at startup from an optional TOML file. Missing fields fall back
//! to the built-in defaults, which track the three main Korean market indices.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A tracked index: canonical name plus the provider's ticker symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedIndex {
    pub name: String,
    pub ticker: String,
}

impl TrackedIndex {
    pub fn new(name: &str, ticker: &str) -> Self {
        Self {
            name: name.to_string(),
            ticker: ticker.to_string(),
        }
    }
}

/// Default tracked indices
pub fn default_indices() -> Vec<TrackedIndex> {
    vec![
        TrackedIndex::new("KOSPI", "^KS11"),
        TrackedIndex::new("KOSDAQ", "^KQ11"),
        TrackedIndex::new("KOSPI200", "^KS200"),
    ]
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Scheduler intervals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub collect_interval_secs: u64,
    pub status_interval_secs: u64,
}

impl SchedulerConfig {
    pub fn collect_interval(&self) -> Duration {
        Duration::from_secs(self.collect_interval_secs)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            collect_interval_secs: 60,
            status_interval_secs: 10,
        }
    }
}

/// Quote provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Lookback period passed to the provider
    pub range: String,
    /// Bar size passed to the provider
    pub interval: String,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            range: "1d".to_string(),
            interval: "1d".to_string(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub history_limit: usize,
    pub server: ServerConfig,
    pub scheduler: SchedulerConfig,
    pub provider: ProviderConfig,
    pub indices: Vec<TrackedIndex>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("stock_data.db"),
            history_limit: 100,
            server: ServerConfig::default(),
            scheduler: SchedulerConfig::default(),
            provider: ProviderConfig::default(),
            indices: default_indices(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                tracing::info!("Loaded configuration from {}", path.display());
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| AppError::Config(format!("Invalid configuration: {}", e)))
    }

    /// Check the invariants the rest of the application relies on
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.collect_interval_secs == 0 || self.scheduler.status_interval_secs == 0 {
            return Err(AppError::Config(
                "Scheduler intervals must be greater than zero".to_string(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(AppError::Config(
                "Provider timeout must be greater than zero".to_string(),
            ));
        }

        if self.history_limit == 0 {
            return Err(AppError::Config(
                "history_limit must be greater than zero".to_string(),
            ));
        }

        if self.indices.is_empty() {
            return Err(AppError::Config(
                "At least one tracked index is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for index in &self.indices {
            if index.name.trim().is_empty() || index.ticker.trim().is_empty() {
                return Err(AppError::Config(
                    "Tracked indices need a non-empty name and ticker".to_string(),
                ));
            }
            if !seen.insert(index.name.as_str()) {
                return Err(AppError::Config(format!(
                    "Duplicate tracked index name: {}",
                    index.name
                )));
            }
        }

        Ok(())
    }
}
