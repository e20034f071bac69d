//! Offline preprocessing of agent trading output into the raw dashboard
//! dataset (`agents_data.json`).
//!
//! Each agent directory holds `position/position.jsonl` and
//! `log/<date>/log.jsonl`. Positions are valued against
//! `daily_prices_<SYMBOL>.json` files to give every snapshot a
//! `total_asset`.

pub mod agent;
pub mod prices;

pub use agent::{load_jsonl, process_agent, total_asset};
pub use prices::PriceBook;

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("agent directory not found: {0}")]
    MissingAgent(PathBuf),
    #[error("failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PreprocessError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        PreprocessError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessConfig {
    pub agent_dir: PathBuf,
    pub price_dir: PathBuf,
    pub output: PathBuf,
    /// Agents to process; empty means every sub-directory of `agent_dir`.
    pub agents: Vec<String>,
}

impl PreprocessConfig {
    pub fn from_env() -> Self {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Self {
        let path = |key: &str, default: &str| {
            PathBuf::from(env_map.get(key).map(String::as_str).unwrap_or(default))
        };
        let agents = env_map
            .get("PREPROCESS_AGENTS")
            .map(|list| {
                list.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            agent_dir: path("PREPROCESS_AGENT_DIR", "../data/agent_data"),
            price_dir: path("PREPROCESS_PRICE_DIR", "../data"),
            output: path("PREPROCESS_OUTPUT", "data/agents_data.json"),
            agents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessSummary {
    pub agents_written: usize,
    pub agents_failed: usize,
    pub symbols_loaded: usize,
}

fn discover_agents(agent_dir: &Path) -> Result<Vec<String>, PreprocessError> {
    let entries = std::fs::read_dir(agent_dir).map_err(|e| PreprocessError::io(agent_dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PreprocessError::io(agent_dir, e))?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Builds the dataset for every configured agent in memory.
pub fn build_dataset(
    config: &PreprocessConfig,
    prices: &mut PriceBook,
) -> Result<(Map<String, Value>, usize), PreprocessError> {
    let agents = if config.agents.is_empty() {
        discover_agents(&config.agent_dir)?
    } else {
        config.agents.clone()
    };

    let mut dataset = Map::new();
    let mut failed = 0;
    for name in agents {
        match process_agent(&config.agent_dir, &name, prices) {
            Ok(record) => {
                info!(
                    "Processed {}: {} dates, initial cash {}, final total asset {}",
                    name,
                    record["summary"]["total_dates"],
                    record["summary"]["initial_cash"],
                    record["summary"]["final_total_asset"]
                );
                dataset.insert(name, record);
            }
            Err(e) => {
                warn!("Failed to process {}: {}", name, e);
                failed += 1;
            }
        }
    }
    Ok((dataset, failed))
}

/// Builds the dataset and writes it to `config.output`.
pub fn run(config: &PreprocessConfig) -> Result<PreprocessSummary, PreprocessError> {
    let mut prices = PriceBook::new(&config.price_dir);
    let (dataset, agents_failed) = build_dataset(config, &mut prices)?;

    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PreprocessError::io(parent, e))?;
    }
    let agents_written = dataset.len();
    let body = serde_json::to_vec_pretty(&Value::Object(dataset))?;
    std::fs::write(&config.output, body).map_err(|e| PreprocessError::io(&config.output, e))?;

    info!("Wrote {} agents to {}", agents_written, config.output.display());

    Ok(PreprocessSummary {
        agents_written,
        agents_failed,
        symbols_loaded: prices.symbols_loaded(),
    })
}
