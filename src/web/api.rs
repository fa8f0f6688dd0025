use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use super::AppState;
use crate::errors::QueryError;
use crate::models::MetricSample;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// On-demand query: one synchronous sample through the shared sampler,
/// independent of any session state.
pub async fn get_system_stats(
    State(state): State<AppState>,
) -> Result<Json<MetricSample>, QueryError> {
    let sample = state.sampler.sample().await?;
    Ok(Json(sample))
}

/// Most recent persisted samples, newest first, bounded by the configured
/// limit (default 100).
pub async fn get_system_logs(
    State(state): State<AppState>,
) -> Result<Json<Vec<MetricSample>>, QueryError> {
    let logs = state
        .sample_log
        .recent(state.config.sampler.recent_limit)
        .await?;
    Ok(Json(logs))
}
