//! Pure computation for the dashboard: configuration resolution, ingestion,
//! curve alignment, baseline construction and statistics.

pub mod align;
pub mod baseline;
pub mod ingest;
pub mod matcher;
pub mod resolver;
pub mod stats;

pub use align::{align, align_agent, union_dates};
pub use baseline::{parse_price_payload, reproject, PricePayload, PricePoint};
pub use ingest::{ingest, NormalizedAgent};
pub use matcher::PointIndex;
pub use resolver::{resolve, resolve_from_value, ResolvedConfig};
pub use stats::{summarize, terminal_value};
