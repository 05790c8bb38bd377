//! REST API endpoint handlers

use crate::api::types::{HealthResponse, StatsResponse};
use crate::db::sqlite::{LatestObservation, Observation};
use crate::error::Result;
use crate::services::QueryService;
use crate::state::AppState;
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;

/// Health check endpoint - GET /health or GET /
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

/// Latest observation per index - GET /api/indices
pub async fn get_indices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LatestObservation>>> {
    let latest = QueryService::latest_all(&state)?;
    debug!("Serving latest quotes for {} indices", latest.len());
    Ok(Json(latest))
}

/// History for one index - GET /api/index/:name
///
/// Unknown names (no rows) map to 404 through `AppError::NotFound`.
pub async fn get_index_history(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Observation>>> {
    let rows = QueryService::history(&state, &name)?;
    debug!("Serving {} history rows for {}", rows.len(), name);
    Ok(Json(rows))
}

/// Record counts - GET /api/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>> {
    let stats = QueryService::stats(&state)?;
    Ok(Json(stats.into()))
}
