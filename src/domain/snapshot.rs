//! Raw per-agent records: position snapshots, decision logs and summaries.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Timestamp;

/// Key holding the cash balance inside a holdings map.
pub const CASH_KEY: &str = "CASH";

/// A decision-log entry. Opaque to the loader.
pub type LogEntry = Value;

/// Portfolio state recorded at one timestamp.
///
/// Either a precomputed `total_asset` valuation or a holdings map where
/// `"CASH"` carries the cash balance. The source object is kept verbatim so
/// snapshot consumers see every field the agent wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    pub total_asset: Option<f64>,
    pub holdings: Option<BTreeMap<String, f64>>,
    raw: Value,
}

impl PositionSnapshot {
    /// Lenient parse: wrong-typed fields are treated as absent.
    pub fn from_value(raw: Value) -> Self {
        let total_asset = raw.get("total_asset").and_then(as_number);
        let holdings = raw.get("positions").and_then(Value::as_object).map(|obj| {
            obj.iter()
                .filter_map(|(sym, qty)| as_number(qty).map(|q| (sym.clone(), q)))
                .collect()
        });
        Self {
            total_asset,
            holdings,
            raw,
        }
    }

    /// Scalar valuation of the snapshot.
    ///
    /// `total_asset` wins; otherwise the cash balance (0 when the holdings
    /// map has no `CASH` key). `None` when the snapshot has neither.
    pub fn scalar_value(&self) -> Option<f64> {
        self.total_asset.or_else(|| self.cash())
    }

    /// Cash balance from the holdings map; `None` without holdings.
    pub fn cash(&self) -> Option<f64> {
        self.holdings
            .as_ref()
            .map(|h| h.get(CASH_KEY).copied().unwrap_or(0.0))
    }

    /// Symbols held with positive quantity, excluding cash.
    pub fn open_positions(&self) -> Vec<(&str, f64)> {
        self.holdings
            .iter()
            .flat_map(|h| h.iter())
            .filter(|(sym, qty)| sym.as_str() != CASH_KEY && **qty > 0.0)
            .map(|(sym, qty)| (sym.as_str(), *qty))
            .collect()
    }
}

impl Serialize for PositionSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Per-agent summary block. Only `initial_cash` is interpreted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub initial_cash: Option<f64>,
    raw: Value,
}

impl Summary {
    pub fn from_value(raw: Value) -> Self {
        let initial_cash = raw.get("initial_cash").and_then(as_number);
        Self { initial_cash, raw }
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.raw {
            Value::Null => serializer.serialize_none(),
            raw => raw.serialize(serializer),
        }
    }
}

/// One agent's record as found in the raw dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeriesRecord {
    /// `None` when the record carries no `dates` array at all.
    pub dates: Option<Vec<Timestamp>>,
    pub positions: BTreeMap<Timestamp, PositionSnapshot>,
    pub logs: BTreeMap<Timestamp, Vec<LogEntry>>,
    pub summary: Summary,
}

impl RawSeriesRecord {
    /// Lenient parse of an agent record. Anything missing or mistyped falls
    /// back to an empty container.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let dates = obj.get("dates").and_then(Value::as_array).map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(Timestamp::from)
                .collect()
        });

        let positions = obj
            .get("positions")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter(|(_, snap)| snap.is_object())
                    .map(|(date, snap)| {
                        (Timestamp::new(date.clone()), PositionSnapshot::from_value(snap.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let logs = obj
            .get("logs")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(date, entries)| {
                        let entries = entries.as_array().cloned().unwrap_or_default();
                        (Timestamp::new(date.clone()), entries)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let summary = obj
            .get("summary")
            .filter(|s| s.is_object())
            .cloned()
            .map(Summary::from_value)
            .unwrap_or_default();

        Self {
            dates,
            positions,
            logs,
            summary,
        }
    }
}

/// JSON number, or a string holding one.
pub fn as_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_float(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parses the longest numeric prefix of `s` (after leading whitespace), the
/// way price feeds that suffix units onto numbers expect.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut valid_end = 0;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
                valid_end = end;
            }
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                end += 1;
                if seen_digit {
                    valid_end = end;
                }
            }
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                end += 1;
                if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
                    end += 1;
                }
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    s[..valid_end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn holdings(entries: &[(&str, f64)]) -> PositionSnapshot {
        let map: serde_json::Map<String, Value> = entries
            .iter()
            .map(|(sym, qty)| (sym.to_string(), json!(qty)))
            .collect();
        PositionSnapshot::from_value(json!({ "positions": map }))
    }

    #[test]
    fn test_total_asset_takes_precedence_over_cash() {
        let snap = PositionSnapshot::from_value(json!({
            "total_asset": 5200.0,
            "positions": {"CASH": 100.0, "AAPL": 3.0}
        }));
        assert_eq!(snap.scalar_value(), Some(5200.0));
    }

    #[test]
    fn test_cash_used_without_total_asset() {
        let snap = holdings(&[("CASH", 4100.5), ("NVDA", 2.0)]);
        assert_eq!(snap.scalar_value(), Some(4100.5));
    }

    #[test]
    fn test_missing_cash_key_is_zero() {
        let snap = holdings(&[("NVDA", 2.0)]);
        assert_eq!(snap.scalar_value(), Some(0.0));
    }

    #[test]
    fn test_empty_snapshot_has_no_scalar() {
        let snap = PositionSnapshot::from_value(json!({"date": "2024-01-01"}));
        assert_eq!(snap.scalar_value(), None);
    }

    #[test]
    fn test_open_positions_skip_cash_and_flat() {
        let snap = holdings(&[
            ("CASH", 1000.0),
            ("AAPL", 5.0),
            ("MSFT", 0.0),
            ("TSLA", -1.0),
        ]);
        assert_eq!(snap.open_positions(), vec![("AAPL", 5.0)]);
        assert_eq!(snap.cash(), Some(1000.0));
    }

    #[test]
    fn test_cash_absent_without_holdings() {
        let snap = PositionSnapshot::from_value(json!({"total_asset": 5200.0}));
        assert_eq!(snap.cash(), None);
        assert!(snap.open_positions().is_empty());
    }

    #[test]
    fn test_snapshot_serializes_raw_object() {
        let raw = json!({"date": "2024-01-01", "positions": {"CASH": 1.0}, "id": 7});
        let snap = PositionSnapshot::from_value(raw.clone());
        assert_eq!(serde_json::to_value(&snap).unwrap(), raw);
    }

    #[test]
    fn test_raw_record_defaults_for_missing_fields() {
        let record = RawSeriesRecord::from_value(&json!({"summary": {"initial_cash": 10000}}));
        assert!(record.dates.is_none());
        assert!(record.positions.is_empty());
        assert!(record.logs.is_empty());
        assert_eq!(record.summary.initial_cash, Some(10000.0));
    }

    #[test]
    fn test_raw_record_from_non_object() {
        let record = RawSeriesRecord::from_value(&json!([1, 2, 3]));
        assert_eq!(record, RawSeriesRecord::default());
    }

    #[test]
    fn test_raw_record_ignores_mistyped_entries() {
        let record = RawSeriesRecord::from_value(&json!({
            "dates": ["2024-01-01", 5, "2024-01-02"],
            "positions": {"2024-01-01": {"total_asset": 1.0}, "2024-01-02": "bogus"},
            "logs": {"2024-01-01": [{"a": 1}], "2024-01-02": "bogus"}
        }));
        assert_eq!(
            record.dates,
            Some(vec![Timestamp::new("2024-01-01"), Timestamp::new("2024-01-02")])
        );
        assert_eq!(record.positions.len(), 1);
        assert_eq!(record.logs["2024-01-01"].len(), 1);
        assert!(record.logs["2024-01-02"].is_empty());
    }

    #[test]
    fn test_as_number_accepts_numeric_strings() {
        assert_eq!(as_number(&json!("101.25")), Some(101.25));
        assert_eq!(as_number(&json!(" 42abc")), Some(42.0));
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!(null)), None);
        assert_eq!(as_number(&json!(7)), Some(7.0));
    }

    #[test]
    fn test_parse_leading_float_exponent() {
        assert_eq!(parse_leading_float("1.5e2"), Some(150.0));
        assert_eq!(parse_leading_float("-3."), Some(-3.0));
        assert_eq!(parse_leading_float("."), None);
    }
}
