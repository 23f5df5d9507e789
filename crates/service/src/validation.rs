//! Shared input validation.
//!
//! Every input type accepted by a service implements [`Validate`]; service
//! entry points call it before touching storage, so HTTP handlers, tests and
//! any other caller get the same rules and messages.

use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self { Self(msg.into()) }
}

impl From<ModelError> for ValidationError {
    fn from(e: ModelError) -> Self { Self(e.to_string()) }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Fail with `msg` when `value` is blank.
pub fn required(value: &str, msg: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(msg));
    }
    Ok(())
}

/// Trim, and treat blank as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Reject values longer than `max` characters.
pub fn max_len(value: Option<&str>, max: usize, field: &str) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::new(format!("{field} too long (<={max})"))),
        _ => Ok(()),
    }
}
