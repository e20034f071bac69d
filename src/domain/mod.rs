//! Domain types for the agent performance dashboard.
//!
//! - `Timestamp`: lexicographically ordered snapshot timestamps
//! - Raw agent records (`RawSeriesRecord`, `PositionSnapshot`, `Summary`)
//! - Dataset and baseline configuration
//! - Aligned output curves and statistics

pub mod curve;
pub mod dataset;
pub mod snapshot;
pub mod timestamp;

pub use curve::{AlignedCurve, BaselineCurve, Statistics};
pub use dataset::{
    BaselineKind, BaselineSpec, DatasetMeta, DEFAULT_BASELINE_COLOR, DEFAULT_BASELINE_LABEL,
    DEFAULT_INITIAL_CAPITAL,
};
pub use snapshot::{LogEntry, PositionSnapshot, RawSeriesRecord, Summary, CASH_KEY};
pub use timestamp::Timestamp;
