//! Read-only REST API
//!
//! Endpoints:
//! - `GET /health` - liveness check
//! - `GET /api/indices` - latest observation per index
//! - `GET /api/index/:name` - newest-first history for one index
//! - `GET /api/stats` - record counts

mod server;
pub mod handlers;
mod types;

pub use server::{router, ApiServer};
pub use types::{HealthResponse, StatsResponse};
