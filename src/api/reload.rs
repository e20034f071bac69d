use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub agents: usize,
    pub dates: usize,
    pub baseline: bool,
    pub fingerprint: String,
    pub loaded_at: String,
}

/// Discards the current dashboard and loads everything again.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let dashboard = state.session.reload().await?;
    let ids = dashboard.agent_ids();

    Ok(Json(ReloadResponse {
        agents: ids.len(),
        dates: dashboard.axis(&ids).len(),
        baseline: dashboard.baseline().is_some(),
        fingerprint: dashboard.fingerprint().to_string(),
        loaded_at: dashboard.loaded_at().to_rfc3339(),
    }))
}
