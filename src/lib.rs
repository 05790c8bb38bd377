//! Index Monitor - market index collector
//!
//! Periodically fetches market index quotes, appends them to a SQLite time
//! series and serves the latest and historical values over a small
//! read-only HTTP API.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod providers;
pub mod scheduler;
pub mod services;
pub mod state;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging; `RUST_LOG` overrides the default filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "index_monitor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
