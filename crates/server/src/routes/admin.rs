use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;

use common::types::Message;
use service::auth::domain::{
    AdminClaims, AdminProfile, AuthSession, ForgotPasswordInput, LoginInput, RegisterInput, ResetPasswordInput,
    UpdateProfileInput, VerifyOtpInput,
};

use crate::auth::admin_id;
use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::state::ServerState;

#[derive(Serialize)]
pub struct AdminOutput {
    pub message: String,
    pub admin: AdminProfile,
}

#[utoipa::path(post, path = "/admin/register", tag = "admin", request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Admin created"), (status = 400, description = "Bad Request"), (status = 403, description = "Registration disabled"), (status = 409, description = "Email already in use")))]
pub async fn register(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> Result<(StatusCode, Json<AdminOutput>), ApiError> {
    let admin = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(AdminOutput { message: "admin created".into(), admin })))
}

#[utoipa::path(post, path = "/admin/login", tag = "admin", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Token issued"), (status = 401, description = "Invalid email or password")))]
pub async fn login(State(state): State<ServerState>, JsonBody(input): JsonBody<LoginInput>) -> Result<Json<AuthSession>, ApiError> {
    Ok(Json(state.auth.login(input).await?))
}

#[utoipa::path(post, path = "/admin/forgot-password", tag = "admin", request_body = crate::openapi::ForgotPasswordRequest,
    responses((status = 200, description = "Code emailed"), (status = 404, description = "Unknown email")))]
pub async fn forgot_password(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<ForgotPasswordInput>,
) -> Result<Json<Message>, ApiError> {
    state.auth.forgot_password(input).await?;
    Ok(Json(Message::new("a verification code was sent to your email")))
}

#[utoipa::path(post, path = "/admin/verify-otp", tag = "admin", request_body = crate::openapi::VerifyOtpRequest,
    responses((status = 200, description = "Code accepted"), (status = 400, description = "Invalid otp")))]
pub async fn verify_otp(State(state): State<ServerState>, JsonBody(input): JsonBody<VerifyOtpInput>) -> Result<Json<Message>, ApiError> {
    state.auth.verify_otp(input).await?;
    Ok(Json(Message::new("otp verified; you can now reset the password")))
}

#[utoipa::path(post, path = "/admin/reset-password", tag = "admin", request_body = crate::openapi::ResetPasswordRequest,
    responses((status = 200, description = "Password changed"), (status = 400, description = "Not verified or invalid password")))]
pub async fn reset_password(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<ResetPasswordInput>,
) -> Result<Json<Message>, ApiError> {
    state.auth.reset_password(input).await?;
    Ok(Json(Message::new("password reset")))
}

#[utoipa::path(get, path = "/admin/me", tag = "admin", security(("bearer" = [])),
    responses((status = 200, description = "Current admin"), (status = 401, description = "Missing token"), (status = 403, description = "Invalid token"), (status = 404, description = "Admin no longer exists")))]
pub async fn me(State(state): State<ServerState>, Extension(claims): Extension<AdminClaims>) -> Result<Json<AdminProfile>, ApiError> {
    Ok(Json(state.auth.profile(admin_id(&claims)?).await?))
}

#[utoipa::path(put, path = "/admin/me", tag = "admin", security(("bearer" = [])), request_body = crate::openapi::UpdateProfileRequest,
    responses((status = 200, description = "Profile updated"), (status = 400, description = "Nothing to update"), (status = 409, description = "Email already in use")))]
pub async fn update_me(
    State(state): State<ServerState>,
    Extension(claims): Extension<AdminClaims>,
    JsonBody(input): JsonBody<UpdateProfileInput>,
) -> Result<Json<AdminOutput>, ApiError> {
    let admin = state.auth.update_profile(admin_id(&claims)?, input).await?;
    Ok(Json(AdminOutput { message: "profile updated".into(), admin }))
}
