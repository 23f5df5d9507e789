//! Aggregate statistics for the admin home page.

pub mod repository;
pub mod service;

pub use service::{DashboardService, DashboardStats, TopClient};
