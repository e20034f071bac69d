use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    pub date: Option<String>,
}

/// Every agent's position and decision logs recorded at exactly `date`.
pub async fn get_snapshot(
    Query(params): Query<SnapshotQuery>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let date = params
        .date
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("date is required".to_string()))?;

    let dashboard = state.dashboard().await?;
    let body = serde_json::to_value(dashboard.snapshot_at(date))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(body))
}
