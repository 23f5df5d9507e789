//! Admin authentication: domain, repository and service layers.
//!
//! Covers registration, login, the OTP password-reset flow, profile updates
//! and the bearer tokens checked by the HTTP middleware.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
