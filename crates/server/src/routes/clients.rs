use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use common::types::Message;
use service::clients::domain::{Client, ClientDraft, ClientInput, ClientPatch, ClientSaved};
use service::storage::LogoUpload;

use crate::errors::ApiError;
use crate::state::ServerState;

/// Multipart field carrying the logo file.
pub const LOGO_FIELD: &str = "logo";

/// Split a client form into text fields and the optional logo file.
///
/// An empty file part (a form submitted without choosing a file) counts as no logo.
pub async fn read_client_form(mut multipart: Multipart) -> Result<(ClientInput, Option<LogoUpload>), ApiError> {
    let mut input = ClientInput::default();
    let mut logo = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == LOGO_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            if !file_name.is_empty() && !bytes.is_empty() {
                logo = Some(LogoUpload::new(file_name, bytes.to_vec()));
            }
            continue;
        }
        let value = field.text().await?;
        if !input.set_field(&name, value) {
            debug!(field = %name, "ignoring unknown form field");
        }
    }
    Ok((input, logo))
}

/// Ids that do not parse cannot name a stored row.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{entity} not found")))
}

#[utoipa::path(get, path = "/clients", tag = "clients", security(("bearer" = [])),
    responses((status = 200, description = "All clients, newest first")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.clients.list().await?))
}

#[utoipa::path(post, path = "/clients", tag = "clients", security(("bearer" = [])),
    request_body(content = crate::openapi::ClientForm, content_type = "multipart/form-data"),
    responses((status = 201, description = "Client created"), (status = 400, description = "Bad Request"), (status = 409, description = "Name already used")))]
pub async fn create(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ClientSaved>), ApiError> {
    let (input, logo) = read_client_form(multipart?).await?;
    let saved = state.clients.create(ClientDraft(input), logo).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[utoipa::path(get, path = "/clients/{client}", tag = "clients", security(("bearer" = [])),
    params(("client" = String, Path, description = "Client id")),
    responses((status = 200, description = "Client"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(client): Path<String>) -> Result<Json<Client>, ApiError> {
    let id = parse_id(&client, "client")?;
    Ok(Json(state.clients.get(id).await?))
}

#[utoipa::path(put, path = "/clients/{client}", tag = "clients", security(("bearer" = [])),
    params(("client" = String, Path, description = "Client id")),
    request_body(content = crate::openapi::ClientForm, content_type = "multipart/form-data"),
    responses((status = 200, description = "Client updated"), (status = 404, description = "Not Found"), (status = 409, description = "Name already used")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(client): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClientSaved>, ApiError> {
    let id = parse_id(&client, "client")?;
    let (input, logo) = read_client_form(multipart?).await?;
    Ok(Json(state.clients.update(id, ClientPatch(input), logo).await?))
}

#[utoipa::path(delete, path = "/clients/{client}", tag = "clients", security(("bearer" = [])),
    params(("client" = String, Path, description = "Client id")),
    responses((status = 200, description = "Client, its reviews and logo deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(client): Path<String>) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&client, "client")?;
    state.clients.delete(id).await?;
    Ok(Json(Message::new("client deleted")))
}
