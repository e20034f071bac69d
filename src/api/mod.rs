pub mod agents;
pub mod baseline;
pub mod curves;
pub mod health;
pub mod reload;
pub mod snapshot;
pub mod statistics;

use crate::error::AppError;
use crate::orchestration::{Dashboard, DashboardSession};
use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<DashboardSession>,
}

impl AppState {
    pub fn new(session: Arc<DashboardSession>) -> Self {
        Self { session }
    }

    /// Current dashboard, or `NotLoaded` before the first successful load.
    pub async fn dashboard(&self) -> Result<Arc<Dashboard>, AppError> {
        self.session.current().await.ok_or(AppError::NotLoaded)
    }
}

/// `?agents=a,b` selection shared by the series endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub agents: Option<String>,
}

impl SelectionQuery {
    /// Requested ids in order; every loaded agent when the parameter is absent.
    pub fn resolve(&self, dashboard: &Dashboard) -> Vec<String> {
        match &self.agents {
            None => dashboard.agent_ids(),
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/reload", post(reload::reload))
        .route("/v1/agents", get(agents::get_agents))
        .route("/v1/curves", get(curves::get_curves))
        .route("/v1/baseline", get(baseline::get_baseline))
        .route("/v1/statistics", get(statistics::get_statistics))
        .route("/v1/snapshot", get(snapshot::get_snapshot))
        .layer(cors)
        .with_state(state)
}
