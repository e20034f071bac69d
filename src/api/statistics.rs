use axum::extract::{Query, State};
use axum::Json;

use crate::api::{AppState, SelectionQuery};
use crate::domain::Statistics;
use crate::error::AppError;

pub async fn get_statistics(
    Query(params): Query<SelectionQuery>,
    State(state): State<AppState>,
) -> Result<Json<Statistics>, AppError> {
    let dashboard = state.dashboard().await?;
    let selected = params.resolve(&dashboard);
    Ok(Json(dashboard.statistics(&selected)))
}
