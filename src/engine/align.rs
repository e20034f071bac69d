//! Curve alignment onto the union date axis of a selection of agents.

use crate::domain::{AlignedCurve, PositionSnapshot, Timestamp};
use crate::engine::ingest::NormalizedAgent;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Sorted union of the selected agents' dates. Unknown ids contribute nothing.
pub fn union_dates<S: AsRef<str>>(
    agents: &BTreeMap<String, NormalizedAgent>,
    selected: &[S],
) -> Vec<Timestamp> {
    let axis: BTreeSet<&Timestamp> = selected
        .iter()
        .filter_map(|id| agents.get(id.as_ref()))
        .flat_map(|agent| agent.dates.iter())
        .collect();
    axis.into_iter().cloned().collect()
}

/// Aligns each selected agent onto the union axis of the selection.
///
/// Values come from the agent's snapshots by exact timestamp, then by the
/// same-day rule, and are otherwise forward-filled. Ids not present in
/// `agents` are skipped.
pub fn align<S: AsRef<str>>(
    agents: &BTreeMap<String, NormalizedAgent>,
    selected: &[S],
) -> BTreeMap<String, AlignedCurve> {
    let axis = union_dates(agents, selected);
    let mut curves = BTreeMap::new();

    for id in selected {
        let id = id.as_ref();
        let Some(agent) = agents.get(id) else {
            warn!("Skipping unknown agent {} during alignment", id);
            continue;
        };
        curves.insert(id.to_string(), align_agent(agent, &axis));
    }

    curves
}

/// One agent's curve over a caller-supplied axis.
pub fn align_agent(agent: &NormalizedAgent, axis: &[Timestamp]) -> AlignedCurve {
    let values = agent
        .position_index()
        .forward_fill(axis, PositionSnapshot::scalar_value);
    AlignedCurve {
        dates: axis.to_vec(),
        values,
    }
}
