//! Building one agent's raw record from its position and log files.

use crate::domain::snapshot::as_number;
use crate::domain::{CASH_KEY, DEFAULT_INITIAL_CAPITAL};
use crate::preprocess::prices::PriceBook;
use crate::preprocess::PreprocessError;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed lines of a JSONL file. A missing file has no lines; malformed
/// lines are skipped.
pub fn load_jsonl(path: &Path) -> Result<Vec<Value>, PreprocessError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| PreprocessError::io(path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Skipping malformed line in {}: {}", path.display(), e);
                None
            }
        })
        .collect())
}

/// Cash plus the market value of every open position at the record's date.
pub fn total_asset(record: &Value, initial_cash: f64, prices: &mut PriceBook) -> f64 {
    let Some(holdings) = record.get("positions").and_then(Value::as_object) else {
        return initial_cash;
    };
    let date = record.get("date").and_then(Value::as_str).unwrap_or("");
    let cash = holdings
        .get(CASH_KEY)
        .and_then(as_number)
        .unwrap_or(initial_cash);

    let holdings_value: f64 = holdings
        .iter()
        .filter(|(symbol, _)| symbol.as_str() != CASH_KEY)
        .filter_map(|(symbol, qty)| as_number(qty).map(|q| (symbol, q)))
        .filter(|(_, qty)| *qty > 0.0)
        .map(|(symbol, qty)| prices.price_at(symbol, date) * qty)
        .sum();

    cash + holdings_value
}

fn find_log_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), PreprocessError> {
    if !dir.is_dir() {
        return Ok(());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| PreprocessError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| PreprocessError::io(dir, e))?.path();
        if path.is_dir() {
            find_log_files(&path, out)?;
        } else if path.file_name().and_then(|n| n.to_str()) == Some("log.jsonl") {
            out.push(path);
        }
    }
    Ok(())
}

/// Builds the raw dataset record of the agent stored under `agent_dir/name`.
pub fn process_agent(
    agent_dir: &Path,
    name: &str,
    prices: &mut PriceBook,
) -> Result<Value, PreprocessError> {
    let root = agent_dir.join(name);
    if !root.is_dir() {
        return Err(PreprocessError::MissingAgent(root));
    }

    let records = load_jsonl(&root.join("position").join("position.jsonl"))?;
    let initial_cash = records
        .first()
        .and_then(|r| r.get("positions"))
        .and_then(|p| p.get(CASH_KEY))
        .and_then(as_number)
        .unwrap_or(DEFAULT_INITIAL_CAPITAL);

    let mut positions = Map::new();
    let mut final_total_asset = initial_cash;
    for mut record in records {
        let Some(date) = record
            .get("date")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
        else {
            // Dateless records are not valued; only a stored total counts.
            final_total_asset = record
                .get("total_asset")
                .and_then(as_number)
                .unwrap_or(initial_cash);
            continue;
        };
        let total = total_asset(&record, initial_cash, prices);
        final_total_asset = total;
        if let Some(obj) = record.as_object_mut() {
            obj.insert("total_asset".to_string(), json!(total));
        }
        positions.insert(date, record);
    }

    let mut log_files = Vec::new();
    find_log_files(&root.join("log"), &mut log_files)?;
    log_files.sort();

    let mut dates = BTreeSet::new();
    let mut logs: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for file in log_files {
        let Some(date) = file
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .map(str::to_string)
        else {
            continue;
        };
        let entries = load_jsonl(&file)?;
        dates.insert(date.clone());
        logs.entry(date).or_default().extend(entries);
    }

    let date_list: Vec<&String> = dates.iter().collect();
    Ok(json!({
        "agent_name": name,
        "dates": date_list,
        "positions": positions,
        "logs": logs,
        "summary": {
            "total_dates": dates.len(),
            "initial_cash": initial_cash,
            "final_total_asset": final_total_asset,
        }
    }))
}
