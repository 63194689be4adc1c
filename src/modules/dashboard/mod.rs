pub mod queries;
pub mod service;

pub use service::{DashboardService, compute_stats};
