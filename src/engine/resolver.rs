//! Dataset configuration resolution with per-field defaults.

use crate::datasource::{prefix_data_path, DataSource, DEFAULT_SOURCE_LOCATION};
use crate::domain::snapshot::as_number;
use crate::domain::{BaselineKind, BaselineSpec, DatasetMeta};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// What to load and how to present it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub source_location: String,
    /// Empty means every agent in the raw dataset.
    pub dataset_meta: Vec<DatasetMeta>,
    pub baseline: BaselineSpec,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            source_location: DEFAULT_SOURCE_LOCATION.to_string(),
            dataset_meta: Vec::new(),
            baseline: BaselineSpec::default(),
        }
    }
}

impl ResolvedConfig {
    pub fn meta_for(&self, id: &str) -> Option<&DatasetMeta> {
        self.dataset_meta.iter().find(|m| m.id == id)
    }
}

/// Fetches the configuration at `location`; any failure yields the defaults.
pub async fn resolve(source: &dyn DataSource, location: &str) -> ResolvedConfig {
    match source.fetch_json(location).await {
        Ok(payload) => {
            debug!("Loaded dataset configuration from {}", location);
            resolve_from_value(&payload)
        }
        Err(e) => {
            warn!("Dataset configuration {} unavailable ({}); using defaults", location, e);
            ResolvedConfig::default()
        }
    }
}

/// Resolves a configuration payload. Each field falls back on its own.
pub fn resolve_from_value(payload: &Value) -> ResolvedConfig {
    let Some(obj) = payload.as_object() else {
        warn!("Dataset configuration is not a JSON object; using defaults");
        return ResolvedConfig::default();
    };

    let source_location = obj
        .get("source")
        .and_then(Value::as_str)
        .and_then(prefix_data_path)
        .unwrap_or_else(|| DEFAULT_SOURCE_LOCATION.to_string());

    let dataset_meta = match obj.get("datasets") {
        Some(Value::Array(entries)) => entries.iter().filter_map(parse_dataset_meta).collect(),
        Some(_) => {
            warn!("Dataset configuration field `datasets` is not an array; including all agents");
            Vec::new()
        }
        None => Vec::new(),
    };

    let baseline = match obj.get("baseline") {
        None => BaselineSpec::default(),
        Some(value) => parse_baseline(value),
    };

    ResolvedConfig {
        source_location,
        dataset_meta,
        baseline,
    }
}

fn parse_dataset_meta(entry: &Value) -> Option<DatasetMeta> {
    let id = entry.get("id").and_then(Value::as_str).filter(|s| !s.is_empty());
    let Some(id) = id else {
        warn!("Skipping dataset entry without an id: {}", entry);
        return None;
    };
    let text = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);
    Some(DatasetMeta {
        id: id.to_string(),
        label: text("label"),
        color: text("color"),
        description: text("description"),
    })
}

/// `null` disables the baseline; a bare string names its type; an object
/// overrides the default field by field.
pub fn parse_baseline(value: &Value) -> BaselineSpec {
    match value {
        Value::Null => BaselineSpec::disabled(),
        Value::String(kind) => BaselineSpec {
            kind: BaselineKind::parse(kind),
            ..BaselineSpec::default()
        },
        Value::Object(obj) => merge_baseline(obj),
        other => {
            warn!("Unrecognised baseline configuration {}; using default", other);
            BaselineSpec::default()
        }
    }
}

fn merge_baseline(obj: &Map<String, Value>) -> BaselineSpec {
    let defaults = BaselineSpec::default();
    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .map(BaselineKind::parse)
        .unwrap_or(defaults.kind);

    let initial_capital = obj
        .get("initial_capital")
        .or_else(|| obj.get("initialCapital"))
        .and_then(as_number);

    BaselineSpec {
        kind,
        value: obj.get("value").and_then(as_number),
        label: text("label").unwrap_or(defaults.label),
        color: text("color").unwrap_or(defaults.color),
        source: text("source"),
        initial_capital,
    }
}
