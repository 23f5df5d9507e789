use thiserror::Error;

use crate::mailer::MailError;
use crate::validation::ValidationError;

/// Business errors for admin auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("admin not found")]
    NotFound,
    #[error("invalid email or password")]
    Unauthorized,
    #[error("registration is disabled")]
    RegistrationDisabled,
    #[error("invalid otp")]
    InvalidOtp,
    #[error("otp verification required before resetting the password")]
    ResetNotAuthorized,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error(transparent)]
    Mail(#[from] MailError),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict(_) => 1002,
            AuthError::NotFound => 1003,
            AuthError::Unauthorized => 1004,
            AuthError::RegistrationDisabled => 1005,
            AuthError::InvalidOtp => 1006,
            AuthError::ResetNotAuthorized => 1007,
            AuthError::InvalidToken => 1008,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Mail(_) => 1103,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(e: ValidationError) -> Self { AuthError::Validation(e.0) }
}
