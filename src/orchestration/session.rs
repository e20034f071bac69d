//! Dashboard session: owns a data source and the current dashboard, and
//! serializes reloads.

use crate::datasource::DataSource;
use crate::orchestration::loader::{load_dashboard, Dashboard, LoadError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a load is already in progress")]
    LoadInProgress,
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Explicit per-session context. Independent sessions share nothing.
#[derive(Debug)]
pub struct DashboardSession {
    datasource: Arc<dyn DataSource>,
    config_location: String,
    current: RwLock<Option<Arc<Dashboard>>>,
    load_guard: Mutex<()>,
}

impl DashboardSession {
    pub fn new(datasource: Arc<dyn DataSource>, config_location: impl Into<String>) -> Self {
        Self {
            datasource,
            config_location: config_location.into(),
            current: RwLock::new(None),
            load_guard: Mutex::new(()),
        }
    }

    /// The most recently loaded dashboard, if any load has succeeded.
    pub async fn current(&self) -> Option<Arc<Dashboard>> {
        self.current.read().await.clone()
    }

    /// Runs a full load and replaces the current dashboard on success.
    ///
    /// A reload requested while another is running is rejected rather than
    /// queued. A failed load leaves the previous dashboard in place.
    pub async fn reload(&self) -> Result<Arc<Dashboard>, SessionError> {
        let _guard = self
            .load_guard
            .try_lock()
            .map_err(|_| SessionError::LoadInProgress)?;

        info!("Reloading dashboard data");
        let dashboard = match load_dashboard(self.datasource.as_ref(), &self.config_location).await {
            Ok(d) => Arc::new(d),
            Err(e) => {
                warn!("Dashboard load failed: {}", e);
                return Err(e.into());
            }
        };

        *self.current.write().await = Some(dashboard.clone());
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{DataSourceError, MockDataSource, DEFAULT_CONFIG_LOCATION};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves the raw dataset on the first fetch only; later fetches fail.
    #[derive(Debug, Default)]
    struct OneShotSource {
        raw_fetches: AtomicUsize,
    }

    #[async_trait]
    impl DataSource for OneShotSource {
        async fn fetch_json(&self, location: &str) -> Result<Value, DataSourceError> {
            if location != "data/agents_data.json" {
                return Err(DataSourceError::NotFound(location.to_string()));
            }
            if self.raw_fetches.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(json!({"a": {"dates": ["2024-01-01"]}}))
            } else {
                Err(DataSourceError::HttpError {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                })
            }
        }
    }

    fn session_with(raw: serde_json::Value) -> DashboardSession {
        let source = MockDataSource::new().with_json("data/agents_data.json", raw);
        DashboardSession::new(Arc::new(source), DEFAULT_CONFIG_LOCATION)
    }

    #[tokio::test]
    async fn test_not_loaded_initially() {
        let session = session_with(json!({}));
        assert!(session.current().await.is_none());
    }

    #[tokio::test]
    async fn test_reload_installs_dashboard() {
        let session = session_with(json!({"a": {"dates": ["2024-01-01"]}}));
        let dashboard = session.reload().await.unwrap();
        let current = session.current().await.unwrap();
        assert!(Arc::ptr_eq(&dashboard, &current));
    }

    #[tokio::test]
    async fn test_failed_first_load_leaves_nothing() {
        let session = DashboardSession::new(Arc::new(MockDataSource::new()), DEFAULT_CONFIG_LOCATION);
        assert!(matches!(session.reload().await, Err(SessionError::Load(_))));
        assert!(session.current().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_reload_after_success_keeps_dashboard() {
        let session = DashboardSession::new(Arc::new(OneShotSource::default()), DEFAULT_CONFIG_LOCATION);
        let loaded = session.reload().await.unwrap();

        let err = session.reload().await.unwrap_err();
        assert!(matches!(err, SessionError::Load(_)));

        let current = session.current().await.unwrap();
        assert!(Arc::ptr_eq(&loaded, &current));
        assert_eq!(current.agent_ids(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_concurrent_reload_rejected() {
        let session = session_with(json!({}));
        let _held = session.load_guard.lock().await;
        assert!(matches!(session.reload().await, Err(SessionError::LoadInProgress)));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let first = session_with(json!({"a": {}}));
        let second = session_with(json!({"b": {}}));
        first.reload().await.unwrap();
        second.reload().await.unwrap();
        assert_eq!(first.current().await.unwrap().agent_ids(), vec!["a"]);
        assert_eq!(second.current().await.unwrap().agent_ids(), vec!["b"]);
    }
}
