use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use common::types::Message;
use service::reviews::domain::{NewReview, Review, ReviewWithClient};

use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::routes::clients::parse_id;
use crate::state::ServerState;

#[derive(Serialize)]
pub struct SubmitOutput {
    pub message: String,
    pub review: Review,
}

#[utoipa::path(post, path = "/clients/{client}/avis", tag = "reviews", request_body = crate::openapi::ReviewRequest,
    params(("client" = String, Path, description = "Client slug")),
    responses((status = 201, description = "Review stored"), (status = 400, description = "Invalid rating or missing comment"), (status = 404, description = "Unknown slug")))]
pub async fn submit(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    JsonBody(input): JsonBody<NewReview>,
) -> Result<(StatusCode, Json<SubmitOutput>), ApiError> {
    let review = state.reviews.submit(&slug, input).await?;
    Ok((StatusCode::CREATED, Json(SubmitOutput { message: "review submitted".into(), review })))
}

#[utoipa::path(get, path = "/clients/{client}/avis", tag = "reviews",
    params(("client" = String, Path, description = "Client slug")),
    responses((status = 200, description = "Reviews, newest first"), (status = 404, description = "Unknown slug")))]
pub async fn list_for_client(State(state): State<ServerState>, Path(slug): Path<String>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.reviews.list_for_slug(&slug).await?))
}

#[utoipa::path(get, path = "/avis", tag = "reviews", security(("bearer" = [])),
    responses((status = 200, description = "Every review with its client name, newest first")))]
pub async fn list_all(State(state): State<ServerState>) -> Result<Json<Vec<ReviewWithClient>>, ApiError> {
    Ok(Json(state.reviews.list_all().await?))
}

#[utoipa::path(delete, path = "/avis/{id}", tag = "reviews", security(("bearer" = [])),
    params(("id" = String, Path, description = "Review id")),
    responses((status = 200, description = "Review deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id, "review")?;
    state.reviews.delete(id).await?;
    Ok(Json(Message::new("review deleted")))
}
