//! Dataset configuration: which agents to show and which benchmark to overlay.

use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 5000.0;
pub const DEFAULT_BASELINE_LABEL: &str = "Initial Balance ($5,000)";
pub const DEFAULT_BASELINE_COLOR: &str = "#64748b";

/// Display metadata for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DatasetMeta {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            color: None,
            description: None,
        }
    }

    /// Label shown for the agent; falls back to its id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineKind {
    Constant,
    PriceSeries,
    None,
}

impl BaselineKind {
    /// Case-insensitive; anything unrecognised is a constant baseline.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => BaselineKind::None,
            "price_series" => BaselineKind::PriceSeries,
            _ => BaselineKind::Constant,
        }
    }
}

/// Benchmark overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSpec {
    #[serde(rename = "type")]
    pub kind: BaselineKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub label: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_capital: Option<f64>,
}

impl Default for BaselineSpec {
    fn default() -> Self {
        Self {
            kind: BaselineKind::Constant,
            value: Some(DEFAULT_INITIAL_CAPITAL),
            label: DEFAULT_BASELINE_LABEL.to_string(),
            color: DEFAULT_BASELINE_COLOR.to_string(),
            source: None,
            initial_capital: None,
        }
    }
}

impl BaselineSpec {
    pub fn disabled() -> Self {
        Self {
            kind: BaselineKind::None,
            ..Self::default()
        }
    }

    pub fn price_series(source: impl Into<String>, initial_capital: f64) -> Self {
        Self {
            kind: BaselineKind::PriceSeries,
            value: None,
            source: Some(source.into()),
            initial_capital: Some(initial_capital),
            ..Self::default()
        }
    }

    /// Flat level of a constant baseline. Zero counts as unset.
    pub fn constant_value(&self) -> f64 {
        nonzero(self.value)
            .or(nonzero(self.initial_capital))
            .unwrap_or(DEFAULT_INITIAL_CAPITAL)
    }

    /// Capital a price series is rebased to.
    pub fn rebase_capital(&self) -> f64 {
        nonzero(self.initial_capital).unwrap_or(DEFAULT_INITIAL_CAPITAL)
    }
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_kind_parse() {
        assert_eq!(BaselineKind::parse("none"), BaselineKind::None);
        assert_eq!(BaselineKind::parse("Price_Series"), BaselineKind::PriceSeries);
        assert_eq!(BaselineKind::parse("constant"), BaselineKind::Constant);
        assert_eq!(BaselineKind::parse("sideways"), BaselineKind::Constant);
    }

    #[test]
    fn test_default_baseline() {
        let spec = BaselineSpec::default();
        assert_eq!(spec.kind, BaselineKind::Constant);
        assert_eq!(spec.constant_value(), 5000.0);
        assert_eq!(spec.label, "Initial Balance ($5,000)");
    }

    #[test]
    fn test_constant_value_falls_back_to_initial_capital() {
        let spec = BaselineSpec {
            value: None,
            initial_capital: Some(10000.0),
            ..BaselineSpec::default()
        };
        assert_eq!(spec.constant_value(), 10000.0);
    }

    #[test]
    fn test_zero_constant_value_counts_as_unset() {
        let spec = BaselineSpec {
            value: Some(0.0),
            initial_capital: None,
            ..BaselineSpec::default()
        };
        assert_eq!(spec.constant_value(), 5000.0);

        let spec = BaselineSpec {
            value: Some(0.0),
            initial_capital: Some(7000.0),
            ..BaselineSpec::default()
        };
        assert_eq!(spec.constant_value(), 7000.0);

        let spec = BaselineSpec {
            value: Some(0.0),
            initial_capital: Some(0.0),
            ..BaselineSpec::default()
        };
        assert_eq!(spec.constant_value(), 5000.0);
        assert_eq!(spec.rebase_capital(), 5000.0);
    }

    #[test]
    fn test_display_label_falls_back_to_id() {
        let mut meta = DatasetMeta::new("deepseek-v3");
        assert_eq!(meta.display_label(), "deepseek-v3");
        meta.label = Some("DeepSeek V3".to_string());
        assert_eq!(meta.display_label(), "DeepSeek V3");
    }

    #[test]
    fn test_spec_serializes_type_field() {
        let json = serde_json::to_value(BaselineSpec::price_series("qqq.json", 5000.0)).unwrap();
        assert_eq!(json["type"], "price_series");
        assert_eq!(json["initialCapital"], 5000.0);
        assert_eq!(json["source"], "qqq.json");
    }
}
