use crate::datasource::{DataSource, FileDataSource, HttpDataSource, DEFAULT_CONFIG_LOCATION};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_source: DataSourceKind,
    pub dataset_config_path: String,
    pub load_on_start: bool,
}

/// Where dashboard resources are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceKind {
    /// Local directory laid out like the served site.
    File { dir: String },
    /// Static site at a base URL.
    Http { base_url: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let data_source = match env_map
            .get("DATA_SOURCE")
            .map(|s| s.as_str())
            .unwrap_or("file")
        {
            "file" => DataSourceKind::File {
                dir: env_map
                    .get("DATA_DIR")
                    .cloned()
                    .unwrap_or_else(|| ".".to_string()),
            },
            "http" => DataSourceKind::Http {
                base_url: env_map
                    .get("DATA_BASE_URL")
                    .cloned()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| ConfigError::MissingEnv("DATA_BASE_URL".to_string()))?,
            },
            other => {
                return Err(ConfigError::InvalidValue(
                    "DATA_SOURCE".to_string(),
                    format!("must be file or http, got {}", other),
                ))
            }
        };

        let dataset_config_path = env_map
            .get("DATASET_CONFIG_PATH")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_LOCATION.to_string());

        let load_on_start = match env_map
            .get("LOAD_ON_START")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
            .unwrap_or("true")
        {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LOAD_ON_START".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            port,
            data_source,
            dataset_config_path,
            load_on_start,
        })
    }

    pub fn build_datasource(&self) -> Arc<dyn DataSource> {
        match &self.data_source {
            DataSourceKind::File { dir } => Arc::new(FileDataSource::new(dir)),
            DataSourceKind::Http { base_url } => Arc::new(HttpDataSource::new(base_url.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.data_source,
            DataSourceKind::File {
                dir: ".".to_string()
            }
        );
        assert_eq!(config.dataset_config_path, "data/dataset_config.json");
        assert!(config.load_on_start);
    }

    #[test]
    fn test_http_source() {
        let config = Config::from_env_map(env(&[
            ("DATA_SOURCE", "http"),
            ("DATA_BASE_URL", "http://localhost:8000"),
        ]))
        .unwrap();
        assert_eq!(
            config.data_source,
            DataSourceKind::Http {
                base_url: "http://localhost:8000".to_string()
            }
        );
    }

    #[test]
    fn test_http_source_requires_base_url() {
        let result = Config::from_env_map(env(&[("DATA_SOURCE", "http")]));
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATA_BASE_URL"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_env_map(env(&[("PORT", "not_a_number")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_data_source() {
        let result = Config::from_env_map(env(&[("DATA_SOURCE", "ftp")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DATA_SOURCE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_load_on_start_flag() {
        let config = Config::from_env_map(env(&[("LOAD_ON_START", "FALSE")])).unwrap();
        assert!(!config.load_on_start);

        let result = Config::from_env_map(env(&[("LOAD_ON_START", "maybe")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "LOAD_ON_START"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
