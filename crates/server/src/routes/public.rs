use axum::{
    extract::{Path, State},
    Json,
};

use service::clients::domain::PublicClient;

use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(get, path = "/public/{slug}", tag = "public",
    params(("slug" = String, Path, description = "Client slug")),
    responses((status = 200, description = "Public client page data"), (status = 404, description = "Unknown slug")))]
pub async fn client_page(State(state): State<ServerState>, Path(slug): Path<String>) -> Result<Json<PublicClient>, ApiError> {
    Ok(Json(state.clients.public_profile(&slug).await?))
}
