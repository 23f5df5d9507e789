//! Business services for the review-collection backend.
//! - Separates business logic from data access: each service talks to a
//!   repository trait with a SeaORM implementation and an in-memory one.
//! - Reuses entity definitions and field rules from the `models` crate.
//! - Every input type implements [`validation::Validate`]; services run it
//!   before touching storage.

pub mod errors;
pub mod validation;
pub mod auth;
pub mod clients;
pub mod reviews;
pub mod dashboard;
pub mod mailer;
pub mod storage;
pub mod memory;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
