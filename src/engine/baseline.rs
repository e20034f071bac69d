//! Benchmark curves: a flat initial-capital line or a price series rebased to
//! the initial capital.

use crate::datasource::{prefix_data_path, DataSource};
use crate::domain::snapshot::as_number;
use crate::domain::{BaselineCurve, BaselineKind, BaselineSpec, Timestamp};
use crate::engine::matcher::PointIndex;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const HOURLY_SERIES_KEY: &str = "Time Series (60min)";
const DAILY_SERIES_KEY: &str = "Time Series (Daily)";
const CLOSE_KEYS: [&str; 3] = ["4. close", "4. Close", "close"];

/// One valid observation of a price feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: Timestamp,
    pub close: f64,
}

/// The recognised layouts of a price feed, in detection order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricePayload<'a> {
    /// `{"Time Series (60min)": {date: {"4. close": ...}}}`
    Hourly(&'a Map<String, Value>),
    /// `{"Time Series (Daily)": {date: {"4. close": ...}}}`
    Daily(&'a Map<String, Value>),
    /// `{"dates": [...], "values": [...]}`
    Parallel {
        dates: &'a [Value],
        values: &'a [Value],
    },
    /// `[{"date": ..., "close": ...}, ...]` or `[[date, close], ...]`
    Records(&'a [Value]),
    /// `{date: close}` or `{date: {"close": ...}}`
    Flat(&'a Map<String, Value>),
}

impl<'a> PricePayload<'a> {
    /// First layout whose structure matches `payload`.
    pub fn detect(payload: &'a Value) -> Option<Self> {
        match payload {
            Value::Object(obj) => {
                if let Some(table) = obj.get(HOURLY_SERIES_KEY).and_then(Value::as_object) {
                    return Some(PricePayload::Hourly(table));
                }
                if let Some(table) = obj.get(DAILY_SERIES_KEY).and_then(Value::as_object) {
                    return Some(PricePayload::Daily(table));
                }
                if let (Some(dates), Some(values)) = (
                    obj.get("dates").and_then(Value::as_array),
                    obj.get("values").and_then(Value::as_array),
                ) {
                    return Some(PricePayload::Parallel { dates, values });
                }
                Some(PricePayload::Flat(obj))
            }
            Value::Array(records) => Some(PricePayload::Records(records)),
            _ => None,
        }
    }

    /// Raw `(date, close)` entries, before validation.
    fn entries(&self) -> Vec<(Option<String>, Option<f64>)> {
        match self {
            PricePayload::Hourly(table) | PricePayload::Daily(table) => table
                .iter()
                .map(|(date, bar)| (Some(date.clone()), keyed_close(bar)))
                .collect(),
            PricePayload::Parallel { dates, values } => dates
                .iter()
                .enumerate()
                .map(|(idx, date)| {
                    (
                        date.as_str().map(str::to_string),
                        values.get(idx).and_then(as_number),
                    )
                })
                .collect(),
            PricePayload::Records(records) => records.iter().map(record_entry).collect(),
            PricePayload::Flat(map) => map
                .iter()
                .map(|(date, value)| {
                    let close = match value {
                        Value::Object(obj) => obj.get("close").and_then(as_number),
                        other => as_number(other),
                    };
                    (Some(date.clone()), close)
                })
                .collect(),
        }
    }
}

fn keyed_close(bar: &Value) -> Option<f64> {
    CLOSE_KEYS
        .iter()
        .find_map(|key| bar.get(*key).and_then(as_number))
}

fn record_entry(record: &Value) -> (Option<String>, Option<f64>) {
    match record {
        Value::Object(obj) => {
            let date = ["date", "timestamp"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_str))
                .map(str::to_string);
            let close = ["close", "value"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(as_number));
            (date, close)
        }
        Value::Array(pair) => (
            pair.first().and_then(Value::as_str).map(str::to_string),
            pair.get(1).and_then(as_number),
        ),
        _ => (None, None),
    }
}

/// Calendar interpretation of a feed timestamp, used only for ordering.
pub fn parse_calendar(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Valid points of a price feed, ascending by calendar date.
///
/// Entries without a date or with a non-numeric close are dropped. Dates that
/// do not parse sort after every parseable one. An unrecognised payload
/// yields nothing.
pub fn parse_price_payload(payload: &Value) -> Vec<PricePoint> {
    let Some(shape) = PricePayload::detect(payload) else {
        return Vec::new();
    };

    let mut points: Vec<(Option<NaiveDateTime>, PricePoint)> = shape
        .entries()
        .into_iter()
        .filter_map(|(date, close)| {
            let date = date.filter(|d| !d.is_empty())?;
            let close = close?;
            Some((
                parse_calendar(&date),
                PricePoint {
                    date: Timestamp::new(date),
                    close,
                },
            ))
        })
        .collect();

    points.sort_by(|(a_at, a), (b_at, b)| {
        (a_at.is_none(), a_at, &a.date).cmp(&(b_at.is_none(), b_at, &b.date))
    });
    points.into_iter().map(|(_, p)| p).collect()
}

/// Scales `points` so the first close maps to `initial_capital`.
///
/// `None` for an empty feed or a zero first close.
pub fn rebase(points: &[PricePoint], initial_capital: f64) -> Option<(Vec<Timestamp>, Vec<f64>)> {
    let first = points.first()?;
    if first.close == 0.0 {
        return None;
    }
    let dates = points.iter().map(|p| p.date.clone()).collect();
    let values = points
        .iter()
        .map(|p| initial_capital * (p.close / first.close))
        .collect();
    Some((dates, values))
}

/// Flat baseline at the configured constant level over `dates`.
pub fn constant_curve(spec: &BaselineSpec, dates: &[Timestamp]) -> BaselineCurve {
    let level = spec.constant_value();
    BaselineCurve {
        label: spec.label.clone(),
        color: spec.color.clone(),
        dates: dates.to_vec(),
        values: vec![level; dates.len()],
    }
}

/// Price baseline from an already-fetched payload.
pub fn price_curve(spec: &BaselineSpec, payload: &Value) -> Option<BaselineCurve> {
    let points = parse_price_payload(payload);
    let (dates, values) = rebase(&points, spec.rebase_capital())?;
    Some(BaselineCurve {
        label: spec.label.clone(),
        color: spec.color.clone(),
        dates,
        values,
    })
}

/// Builds the benchmark curve for `spec`.
///
/// Constant baselines use `union_dates`; price baselines keep the feed's own
/// dates. Every failure (disabled, unreachable feed, unusable payload) is
/// `None`, never an error.
pub async fn build(
    source: &dyn DataSource,
    spec: &BaselineSpec,
    union_dates: &[Timestamp],
) -> Option<BaselineCurve> {
    match spec.kind {
        BaselineKind::None => {
            debug!("Baseline disabled");
            None
        }
        BaselineKind::Constant => Some(constant_curve(spec, union_dates)),
        BaselineKind::PriceSeries => {
            let Some(location) = spec.source.as_deref().and_then(prefix_data_path) else {
                warn!("Price baseline has no source; omitting baseline");
                return None;
            };
            let payload = match source.fetch_json(&location).await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Baseline source {} failed: {}", location, e);
                    return None;
                }
            };
            let curve = price_curve(spec, &payload);
            match &curve {
                Some(c) => debug!("Baseline curve from {}: {} points", location, c.dates.len()),
                None => warn!("Baseline source {} has no usable prices", location),
            }
            curve
        }
    }
}

/// Projects a baseline onto a chart axis with the same exact / same-day /
/// forward-fill matching used for agent curves.
pub fn reproject(curve: &BaselineCurve, axis: &[Timestamp]) -> Vec<Option<f64>> {
    let points: BTreeMap<Timestamp, f64> = curve
        .dates
        .iter()
        .cloned()
        .zip(curve.values.iter().copied())
        .collect();
    PointIndex::new(&points).forward_fill(axis, |v| Some(*v))
}
