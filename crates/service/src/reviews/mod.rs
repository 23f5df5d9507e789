//! Public review submission and admin moderation.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::ReviewService;
