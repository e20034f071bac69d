//! One full load cycle and the immutable dashboard it produces.

use crate::datasource::{DataSource, DataSourceError};
use crate::domain::{
    AlignedCurve, BaselineCurve, BaselineKind, LogEntry, PositionSnapshot, Statistics, Timestamp,
};
use crate::engine::baseline::{self, constant_curve};
use crate::engine::{align, ingest, resolve, summarize, union_dates, NormalizedAgent, ResolvedConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

/// Fatal failure of a load: the raw dataset could not be obtained.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load agent data from {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: DataSourceError,
    },
}

/// Display entry for one loaded agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dates: usize,
}

/// Position and logs of one agent at one timestamp, with the cash balance
/// and open-position count of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSnapshot<'a> {
    pub position: Option<&'a PositionSnapshot>,
    pub cash: Option<f64>,
    pub open_positions: usize,
    pub logs: &'a [LogEntry],
}

impl<'a> DateSnapshot<'a> {
    fn new(position: Option<&'a PositionSnapshot>, logs: &'a [LogEntry]) -> Self {
        Self {
            position,
            cash: position.and_then(PositionSnapshot::cash),
            open_positions: position.map_or(0, |p| p.open_positions().len()),
            logs,
        }
    }
}

/// Everything one load produced. Never mutated; a reload builds a new one.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: ResolvedConfig,
    agents: BTreeMap<String, NormalizedAgent>,
    baseline: Option<BaselineCurve>,
    loaded_at: DateTime<Utc>,
    fingerprint: String,
}

impl Dashboard {
    pub fn new(
        config: ResolvedConfig,
        agents: BTreeMap<String, NormalizedAgent>,
        baseline: Option<BaselineCurve>,
    ) -> Self {
        let mut dashboard = Self {
            config,
            agents,
            baseline,
            loaded_at: Utc::now(),
            fingerprint: String::new(),
        };
        dashboard.fingerprint = dashboard.compute_fingerprint();
        dashboard
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn agents(&self) -> &BTreeMap<String, NormalizedAgent> {
        &self.agents
    }

    pub fn agent(&self, id: &str) -> Option<&NormalizedAgent> {
        self.agents.get(id)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// SHA-256 over the aligned curves of every agent and the baseline.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Loaded agent ids: configured order when a dataset list exists,
    /// otherwise sorted.
    pub fn agent_ids(&self) -> Vec<String> {
        if self.config.dataset_meta.is_empty() {
            return self.agents.keys().cloned().collect();
        }
        let mut ids: Vec<String> = Vec::new();
        for meta in &self.config.dataset_meta {
            if self.agents.contains_key(&meta.id) && !ids.contains(&meta.id) {
                ids.push(meta.id.clone());
            }
        }
        ids
    }

    pub fn agent_infos(&self) -> Vec<AgentInfo> {
        self.agent_ids()
            .into_iter()
            .map(|id| {
                let meta = self.config.meta_for(&id);
                AgentInfo {
                    label: meta.map_or_else(|| id.clone(), |m| m.display_label().to_string()),
                    color: meta.and_then(|m| m.color.clone()),
                    description: meta.and_then(|m| m.description.clone()),
                    dates: self.agents.get(&id).map_or(0, |a| a.dates.len()),
                    id,
                }
            })
            .collect()
    }

    /// Union date axis of the selection.
    pub fn axis<S: AsRef<str>>(&self, selected: &[S]) -> Vec<Timestamp> {
        union_dates(&self.agents, selected)
    }

    pub fn curves<S: AsRef<str>>(&self, selected: &[S]) -> BTreeMap<String, AlignedCurve> {
        align(&self.agents, selected)
    }

    pub fn statistics<S: AsRef<str>>(&self, selected: &[S]) -> Statistics {
        summarize(&self.agents, selected)
    }

    /// Baseline for a selection. Constant baselines follow the selection's
    /// axis; price baselines keep the curve fetched at load time.
    pub fn baseline_for<S: AsRef<str>>(&self, selected: &[S]) -> Option<BaselineCurve> {
        match self.config.baseline.kind {
            BaselineKind::None => None,
            BaselineKind::Constant => Some(constant_curve(&self.config.baseline, &self.axis(selected))),
            BaselineKind::PriceSeries => self.baseline.clone(),
        }
    }

    /// Baseline as built at load time over every agent's dates.
    pub fn baseline(&self) -> Option<&BaselineCurve> {
        self.baseline.as_ref()
    }

    /// Every loaded agent's position and logs at exactly `date`.
    pub fn snapshot_at(&self, date: &str) -> BTreeMap<&str, DateSnapshot<'_>> {
        self.agents
            .iter()
            .map(|(id, agent)| {
                let snapshot = DateSnapshot::new(
                    agent.positions.get(date),
                    agent.logs.get(date).map_or(&[][..], Vec::as_slice),
                );
                (id.as_str(), snapshot)
            })
            .collect()
    }

    fn compute_fingerprint(&self) -> String {
        let ids: Vec<&String> = self.agents.keys().collect();
        let curves = align(&self.agents, &ids);
        let canonical = serde_json::to_vec(&(&curves, &self.baseline)).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }
}

/// Runs a full load: configuration, raw dataset, ingestion, baseline.
///
/// Only the raw dataset fetch can fail; configuration and baseline problems
/// degrade to defaults.
pub async fn load_dashboard(
    source: &dyn DataSource,
    config_location: &str,
) -> Result<Dashboard, LoadError> {
    let config = resolve(source, config_location).await;

    info!("Loading agent data from {}", config.source_location);
    let raw = source
        .fetch_json(&config.source_location)
        .await
        .map_err(|e| LoadError::Fetch {
            location: config.source_location.clone(),
            source: e,
        })?;

    let agents = ingest(&raw, &config.dataset_meta);
    let ids: Vec<&String> = agents.keys().collect();
    let axis = union_dates(&agents, &ids);
    let baseline = baseline::build(source, &config.baseline, &axis).await;

    info!(
        "Loaded {} agents over {} dates (baseline: {})",
        agents.len(),
        axis.len(),
        if baseline.is_some() { "on" } else { "off" }
    );

    Ok(Dashboard::new(config, agents, baseline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{MockDataSource, DEFAULT_CONFIG_LOCATION};
    use serde_json::json;

    fn raw_dataset() -> serde_json::Value {
        json!({
            "a": {
                "dates": ["2024-01-01", "2024-01-03"],
                "positions": {
                    "2024-01-01": {"total_asset": 5000.0},
                    "2024-01-03": {"total_asset": 5200.0}
                },
                "logs": {"2024-01-01": [{"msg": "bought"}]}
            },
            "b": {
                "dates": ["2024-01-02"],
                "positions": {"2024-01-02": {"total_asset": 4900.0}}
            }
        })
    }

    #[tokio::test]
    async fn test_load_without_config_includes_everything() {
        let source = MockDataSource::new().with_json("data/agents_data.json", raw_dataset());
        let dashboard = load_dashboard(&source, DEFAULT_CONFIG_LOCATION).await.unwrap();

        assert_eq!(dashboard.agent_ids(), vec!["a", "b"]);
        let baseline = dashboard.baseline().unwrap();
        assert_eq!(baseline.values, vec![5000.0; 3]);
        assert_eq!(
            source.requests(),
            vec![DEFAULT_CONFIG_LOCATION, "data/agents_data.json"]
        );
    }

    #[tokio::test]
    async fn test_missing_raw_dataset_is_fatal() {
        let source = MockDataSource::new();
        let err = load_dashboard(&source, DEFAULT_CONFIG_LOCATION).await.unwrap_err();
        assert!(err.to_string().contains("data/agents_data.json"));
    }

    #[tokio::test]
    async fn test_configured_order_and_labels() {
        let source = MockDataSource::new()
            .with_json(
                DEFAULT_CONFIG_LOCATION,
                json!({
                    "source": "custom.json",
                    "datasets": [
                        {"id": "b", "label": "Bravo", "color": "#123456"},
                        {"id": "a"}
                    ],
                    "baseline": {"type": "none"}
                }),
            )
            .with_json("data/custom.json", raw_dataset());
        let dashboard = load_dashboard(&source, DEFAULT_CONFIG_LOCATION).await.unwrap();

        assert_eq!(dashboard.agent_ids(), vec!["b", "a"]);
        let infos = dashboard.agent_infos();
        assert_eq!(infos[0].label, "Bravo");
        assert_eq!(infos[0].color.as_deref(), Some("#123456"));
        assert_eq!(infos[1].label, "a");
        assert_eq!(infos[1].dates, 2);
        assert!(dashboard.baseline().is_none());
        assert!(dashboard.baseline_for(&["a"]).is_none());
    }

    #[tokio::test]
    async fn test_constant_baseline_follows_selection() {
        let source = MockDataSource::new().with_json("data/agents_data.json", raw_dataset());
        let dashboard = load_dashboard(&source, DEFAULT_CONFIG_LOCATION).await.unwrap();
        let curve = dashboard.baseline_for(&["b"]).unwrap();
        assert_eq!(curve.dates, vec![Timestamp::new("2024-01-02")]);
    }

    #[tokio::test]
    async fn test_snapshot_at_date() {
        let source = MockDataSource::new().with_json("data/agents_data.json", raw_dataset());
        let dashboard = load_dashboard(&source, DEFAULT_CONFIG_LOCATION).await.unwrap();
        let snapshot = dashboard.snapshot_at("2024-01-01");
        assert!(snapshot["a"].position.is_some());
        assert_eq!(snapshot["a"].cash, None);
        assert_eq!(snapshot["a"].open_positions, 0);
        assert_eq!(snapshot["a"].logs.len(), 1);
        assert!(snapshot["b"].position.is_none());
        assert!(snapshot["b"].logs.is_empty());
    }

    #[tokio::test]
    async fn test_fingerprint_stable_across_loads() {
        let source = MockDataSource::new().with_json("data/agents_data.json", raw_dataset());
        let first = load_dashboard(&source, DEFAULT_CONFIG_LOCATION).await.unwrap();
        let second = load_dashboard(&source, DEFAULT_CONFIG_LOCATION).await.unwrap();
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.fingerprint().len(), 64);
    }
}
