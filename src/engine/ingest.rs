//! Series ingestion: raw dataset payload to normalized per-agent series.

use crate::domain::{
    DatasetMeta, LogEntry, PositionSnapshot, RawSeriesRecord, Summary, Timestamp,
    DEFAULT_INITIAL_CAPITAL,
};
use crate::engine::matcher::PointIndex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::warn;

/// One agent's series, ready for alignment. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAgent {
    pub name: String,
    /// Deduplicated, ascending.
    pub dates: Vec<Timestamp>,
    pub positions: BTreeMap<Timestamp, PositionSnapshot>,
    pub logs: BTreeMap<Timestamp, Vec<LogEntry>>,
    pub summary: Summary,
}

impl NormalizedAgent {
    pub fn from_record(name: impl Into<String>, record: RawSeriesRecord) -> Self {
        let RawSeriesRecord {
            dates,
            positions,
            logs,
            summary,
        } = record;

        let dates: BTreeSet<Timestamp> = match dates {
            Some(dates) => dates.into_iter().collect(),
            None => positions.keys().chain(logs.keys()).cloned().collect(),
        };

        Self {
            name: name.into(),
            dates: dates.into_iter().collect(),
            positions,
            logs,
            summary,
        }
    }

    pub fn position_index(&self) -> PointIndex<'_, PositionSnapshot> {
        PointIndex::new(&self.positions)
    }

    pub fn last_date(&self) -> Option<&Timestamp> {
        self.dates.last()
    }

    /// Starting capital; absent or zero falls back to the default.
    pub fn initial_cash(&self) -> f64 {
        self.summary
            .initial_cash
            .filter(|c| *c != 0.0)
            .unwrap_or(DEFAULT_INITIAL_CAPITAL)
    }

    /// Number of decision-log entries across all dates.
    pub fn trade_count(&self) -> usize {
        self.logs.values().map(Vec::len).sum()
    }
}

/// Normalizes every agent in `raw`, keeping only configured ids when
/// `dataset_meta` is non-empty.
pub fn ingest(raw: &Value, dataset_meta: &[DatasetMeta]) -> BTreeMap<String, NormalizedAgent> {
    let Some(payload) = raw.as_object() else {
        warn!("Raw dataset is not a JSON object; no agents loaded");
        return BTreeMap::new();
    };

    let allowed: Option<HashSet<&str>> = if dataset_meta.is_empty() {
        None
    } else {
        Some(dataset_meta.iter().map(|m| m.id.as_str()).collect())
    };

    let agents: BTreeMap<String, NormalizedAgent> = payload
        .iter()
        .filter(|(id, _)| allowed.as_ref().map_or(true, |a| a.contains(id.as_str())))
        .map(|(id, record)| {
            if !record.is_object() {
                warn!("Agent {} has a non-object record; treating as empty", id);
            }
            let agent = NormalizedAgent::from_record(id.clone(), RawSeriesRecord::from_value(record));
            (id.clone(), agent)
        })
        .collect();

    if let Some(allowed) = &allowed {
        for id in allowed.iter().filter(|id| !agents.contains_key(**id)) {
            warn!("Configured agent {} not present in raw dataset", id);
        }
    }

    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "alpha": {
                "dates": ["2024-01-03", "2024-01-01", "2024-01-03"],
                "positions": {
                    "2024-01-01": {"total_asset": 5000.0},
                    "2024-01-03": {"total_asset": 5200.0}
                },
                "logs": {"2024-01-01": [{"action": "buy"}, {"action": "sell"}]},
                "summary": {"initial_cash": 5000.0}
            },
            "beta": {
                "dates": ["2024-01-02"],
                "positions": {"2024-01-02": {"positions": {"CASH": 4900.0}}}
            }
        })
    }

    #[test]
    fn test_dates_sorted_and_deduplicated() {
        let agents = ingest(&payload(), &[]);
        let alpha = &agents["alpha"];
        assert_eq!(
            alpha.dates,
            vec![Timestamp::new("2024-01-01"), Timestamp::new("2024-01-03")]
        );
        assert_eq!(alpha.trade_count(), 2);
    }

    #[test]
    fn test_all_agents_without_meta() {
        let agents = ingest(&payload(), &[]);
        assert_eq!(agents.keys().collect::<Vec<_>>(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_filters_to_configured_ids() {
        let agents = ingest(&payload(), &[DatasetMeta::new("beta"), DatasetMeta::new("ghost")]);
        assert_eq!(agents.keys().collect::<Vec<_>>(), vec!["beta"]);
    }

    #[test]
    fn test_missing_containers_default_empty() {
        let agents = ingest(&json!({"gamma": {}}), &[]);
        let gamma = &agents["gamma"];
        assert!(gamma.dates.is_empty());
        assert!(gamma.positions.is_empty());
        assert_eq!(gamma.trade_count(), 0);
        assert_eq!(gamma.initial_cash(), 5000.0);
    }

    #[test]
    fn test_dates_derived_from_keys_when_absent() {
        let agents = ingest(
            &json!({"delta": {
                "positions": {"2024-01-02 10:00:00": {"total_asset": 1.0}},
                "logs": {"2024-01-01": []}
            }}),
            &[],
        );
        assert_eq!(
            agents["delta"].dates,
            vec![Timestamp::new("2024-01-01"), Timestamp::new("2024-01-02 10:00:00")]
        );
    }

    #[test]
    fn test_non_object_payload_yields_nothing() {
        assert!(ingest(&json!([1, 2]), &[]).is_empty());
        assert!(ingest(&json!(null), &[]).is_empty());
    }

    #[test]
    fn test_zero_initial_cash_uses_default() {
        let agents = ingest(&json!({"z": {"summary": {"initial_cash": 0}}}), &[]);
        assert_eq!(agents["z"].initial_cash(), 5000.0);
    }
}
