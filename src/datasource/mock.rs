//! Mock data source for testing without network or filesystem access.

use super::{DataSource, DataSourceError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory documents keyed by location. Unknown locations are `NotFound`.
///
/// Every requested location is recorded so tests can assert fetch order.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    documents: HashMap<String, Value>,
    failures: HashMap<String, DataSourceError>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockDataSource {
    /// Create a new mock data source with no documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` at `location`.
    pub fn with_json(mut self, location: &str, document: Value) -> Self {
        self.documents.insert(location.to_string(), document);
        self
    }

    /// Fail every fetch of `location` with `error`.
    pub fn with_failure(mut self, location: &str, error: DataSourceError) -> Self {
        self.failures.insert(location.to_string(), error);
        self
    }

    /// Locations requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_json(&self, location: &str) -> Result<Value, DataSourceError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(location.to_string());
        }
        if let Some(err) = self.failures.get(location) {
            return Err(err.clone());
        }
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(location.to_string()))
    }
}
