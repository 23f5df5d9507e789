use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use service::auth::errors::AuthError;
use service::ServiceError;

/// Errors returned by handlers. Every variant renders as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    /// Detail is logged, never sent.
    #[error("internal error: {0}")]
    Internal(String),
}

pub const MISSING_TOKEN: &str = "missing token";
pub const INVALID_TOKEN: &str = "invalid or expired token";

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                "internal server error".to_string()
            }
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::PayloadTooLarge(m) => m,
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => ApiError::BadRequest(m),
            ServiceError::NotFound(m) => ApiError::NotFound(m),
            ServiceError::Conflict(m) => ApiError::Conflict(m),
            ServiceError::Db(_) | ServiceError::Storage(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) => ApiError::BadRequest(m),
            AuthError::Conflict(m) => ApiError::Conflict(m),
            AuthError::NotFound => ApiError::NotFound(e.to_string()),
            AuthError::Unauthorized => ApiError::Unauthorized(e.to_string()),
            AuthError::RegistrationDisabled => ApiError::Forbidden(e.to_string()),
            AuthError::InvalidToken => ApiError::Forbidden(INVALID_TOKEN.into()),
            AuthError::InvalidOtp | AuthError::ResetNotAuthorized => ApiError::BadRequest(e.to_string()),
            AuthError::Mail(_) | AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                ApiError::Internal(format!("[{}] {e}", e.code()))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        warn!(error = %r.body_text(), "rejected json body");
        ApiError::BadRequest(format!("invalid json body: {}", r.body_text()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("upload too large".into())
        } else {
            ApiError::BadRequest(format!("invalid multipart body: {}", e.body_text()))
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(r: MultipartRejection) -> Self {
        ApiError::BadRequest(format!("expected a multipart form: {}", r.body_text()))
    }
}
