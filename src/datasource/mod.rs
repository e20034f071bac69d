//! Data source abstraction for fetching the dashboard's JSON resources:
//! dataset configuration, the raw agent dataset and benchmark price feeds.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

pub mod file;
pub mod http;
pub mod location;
pub mod mock;

pub use file::FileDataSource;
pub use http::HttpDataSource;
pub use location::{
    prefix_data_path, with_cache_buster, DATA_ROOT, DEFAULT_CONFIG_LOCATION,
    DEFAULT_SOURCE_LOCATION,
};
pub use mock::MockDataSource;

/// Source of JSON documents addressed by a location string.
///
/// Locations are either site-relative paths (`data/agents_data.json`) or
/// absolute `http(s)://` URLs. Every call is a single attempt: implementations
/// must not retry.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Fetch and parse the JSON document at `location`.
    ///
    /// Mutable resources may change between calls, so implementations backed
    /// by a cache-capable transport must bypass intermediary caches.
    async fn fetch_json(&self, location: &str) -> Result<Value, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSourceError {
    /// Network error (e.g., connection refused, DNS failure)
    NetworkError(String),
    /// Non-success HTTP status
    HttpError { status: u16, message: String },
    /// Body is not valid JSON
    ParseError(String),
    /// Nothing exists at the location
    NotFound(String),
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::NotFound(location) => write!(f, "Not found: {}", location),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}
