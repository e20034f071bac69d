use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::error::AppError;
use crate::orchestration::AgentInfo;

pub async fn get_agents(State(state): State<AppState>) -> Result<Json<Vec<AgentInfo>>, AppError> {
    let dashboard = state.dashboard().await?;
    Ok(Json(dashboard.agent_infos()))
}
