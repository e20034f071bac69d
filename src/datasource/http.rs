//! HTTP data source backed by `reqwest`.

use super::location::{is_absolute_url, with_cache_buster};
use super::{DataSource, DataSourceError};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Fetches resources from a static site serving the dashboard data.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(base_url: String) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a location, cache buster not yet applied.
    pub fn resolve_url(&self, location: &str) -> String {
        if is_absolute_url(location) {
            location.to_string()
        } else {
            format!("{}/{}", self.base_url, location.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_json(&self, location: &str) -> Result<Value, DataSourceError> {
        let url = with_cache_buster(
            &self.resolve_url(location),
            chrono::Utc::now().timestamp_millis(),
        );
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DataSourceError::NotFound(location.to_string()));
        }
        if !status.is_success() {
            return Err(DataSourceError::HttpError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unexpected status")
                    .to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DataSourceError::ParseError(e.to_string()))
    }
}
