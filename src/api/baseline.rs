use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::{AppState, SelectionQuery};
use crate::domain::BaselineCurve;
use crate::engine::reproject;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct BaselineResponse {
    pub curve: Option<BaselineCurve>,
    /// The curve projected onto the selection's union axis; absent when no
    /// axis date resolves to a baseline value.
    pub projected: Option<Vec<Option<f64>>>,
}

pub async fn get_baseline(
    Query(params): Query<SelectionQuery>,
    State(state): State<AppState>,
) -> Result<Json<BaselineResponse>, AppError> {
    let dashboard = state.dashboard().await?;
    let selected = params.resolve(&dashboard);
    let curve = dashboard.baseline_for(&selected);

    let projected = curve
        .as_ref()
        .map(|c| reproject(c, &dashboard.axis(&selected)))
        .filter(|values| values.iter().any(Option::is_some));

    Ok(Json(BaselineResponse { curve, projected }))
}
