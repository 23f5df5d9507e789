use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use service::auth::domain::AdminClaims;

use crate::errors::{ApiError, INVALID_TOKEN, MISSING_TOKEN};
use crate::state::ServerState;

/// Require `Authorization: Bearer <jwt>` and expose the decoded [`AdminClaims`]
/// as a request extension.
///
/// No token at all is 401; a token that is not a valid Bearer JWT is 403.
pub async fn require_bearer(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim();

    let (scheme, token) = match header.split_once(' ') {
        Some((scheme, token)) => (scheme, token.trim()),
        None => (header, ""),
    };
    if token.is_empty() {
        return Err(ApiError::Unauthorized(MISSING_TOKEN.into()));
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        warn!(path = %req.uri().path(), %scheme, "unsupported authorization scheme");
        return Err(ApiError::Forbidden(INVALID_TOKEN.into()));
    }

    let claims = state.auth.verify_token(token).map_err(|_| {
        warn!(path = %req.uri().path(), "token validation failed");
        ApiError::Forbidden(INVALID_TOKEN.into())
    })?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Admin id carried by verified claims.
pub fn admin_id(claims: &AdminClaims) -> Result<Uuid, ApiError> {
    claims.admin_id().ok_or_else(|| ApiError::Forbidden(INVALID_TOKEN.into()))
}
