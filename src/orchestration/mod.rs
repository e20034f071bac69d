pub mod loader;
pub mod session;

pub use loader::{load_dashboard, AgentInfo, Dashboard, DateSnapshot, LoadError};
pub use session::{DashboardSession, SessionError};
