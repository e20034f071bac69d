//! Aligned output series handed to presentation consumers.

use serde::Serialize;
use std::collections::BTreeMap;

use super::Timestamp;

/// One agent's values over a shared date axis. `None` means nothing has been
/// observed yet at or before that date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedCurve {
    pub dates: Vec<Timestamp>,
    pub values: Vec<Option<f64>>,
}

/// Benchmark curve on its own date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineCurve {
    pub label: String,
    pub color: String,
    pub dates: Vec<Timestamp>,
    pub values: Vec<f64>,
}

/// Terminal performance per agent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_assets: BTreeMap<String, f64>,
    pub returns: BTreeMap<String, f64>,
    pub trade_counts: BTreeMap<String, usize>,
    pub best_agent: Option<String>,
    pub best_return: Option<f64>,
}
