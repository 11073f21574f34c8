pub mod dashboard;
pub mod mock;

pub use dashboard::{DashboardMetrics, DashboardService};
