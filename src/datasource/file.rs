//! Local directory data source.

use super::location::is_absolute_url;
use super::{DataSource, DataSourceError};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Reads resources from a directory laid out like the served site
/// (`<root>/data/...`). Every call reads the file afresh.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    root: PathBuf,
}

impl FileDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve_path(&self, location: &str) -> PathBuf {
        let path = location.split('?').next().unwrap_or(location);
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    async fn fetch_json(&self, location: &str) -> Result<Value, DataSourceError> {
        if is_absolute_url(location) {
            return Err(DataSourceError::Other(format!(
                "file data source cannot fetch remote location {}",
                location
            )));
        }

        let path = self.resolve_path(location);
        debug!("Reading {}", path.display());

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataSourceError::NotFound(location.to_string()),
            _ => DataSourceError::Other(format!("{}: {}", path.display(), e)),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| DataSourceError::ParseError(e.to_string()))
    }
}
