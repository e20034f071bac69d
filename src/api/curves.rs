use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::{AppState, SelectionQuery};
use crate::domain::{AlignedCurve, Timestamp};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct CurvesResponse {
    pub dates: Vec<Timestamp>,
    pub curves: BTreeMap<String, AlignedCurve>,
}

pub async fn get_curves(
    Query(params): Query<SelectionQuery>,
    State(state): State<AppState>,
) -> Result<Json<CurvesResponse>, AppError> {
    let dashboard = state.dashboard().await?;
    let selected = params.resolve(&dashboard);

    Ok(Json(CurvesResponse {
        dates: dashboard.axis(&selected),
        curves: dashboard.curves(&selected),
    }))
}
