//! Terminal performance statistics per agent.

use crate::domain::{PositionSnapshot, Statistics};
use crate::engine::ingest::NormalizedAgent;
use std::collections::BTreeMap;
use tracing::warn;

/// Return on initial cash in percent, rounded to two decimals.
pub fn return_pct(total_asset: f64, initial_cash: f64) -> f64 {
    round2((total_asset - initial_cash) / initial_cash * 100.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Valuation at the agent's last date, or 0 when nothing resolves there.
pub fn terminal_value(agent: &NormalizedAgent) -> f64 {
    agent
        .last_date()
        .and_then(|last| {
            agent
                .position_index()
                .resolve(last.as_str(), PositionSnapshot::scalar_value)
        })
        .unwrap_or(0.0)
}

/// Summarizes the selected agents. Agents without dates are left out; the
/// best agent is the first strictly greatest return in selection order.
pub fn summarize<S: AsRef<str>>(
    agents: &BTreeMap<String, NormalizedAgent>,
    selected: &[S],
) -> Statistics {
    let mut stats = Statistics::default();

    for id in selected {
        let id = id.as_ref();
        let Some(agent) = agents.get(id) else {
            warn!("Skipping unknown agent {} in statistics", id);
            continue;
        };
        if agent.dates.is_empty() {
            continue;
        }

        let total_asset = terminal_value(agent);
        let ret = return_pct(total_asset, agent.initial_cash());

        stats.total_assets.insert(id.to_string(), round2(total_asset));
        stats.returns.insert(id.to_string(), ret);
        stats.trade_counts.insert(id.to_string(), agent.trade_count());

        if stats.best_return.map_or(true, |best| ret > best) {
            stats.best_return = Some(ret);
            stats.best_agent = Some(id.to_string());
        }
    }

    stats
}
