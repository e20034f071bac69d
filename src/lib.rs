pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod preprocess;

pub use config::Config;
pub use datasource::{DataSource, DataSourceError, FileDataSource, HttpDataSource, MockDataSource};
pub use domain::{
    AlignedCurve, BaselineCurve, BaselineKind, BaselineSpec, DatasetMeta, PositionSnapshot,
    Statistics, Timestamp,
};
pub use error::AppError;
pub use orchestration::{Dashboard, DashboardSession, LoadError};
