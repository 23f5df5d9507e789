use axum::{extract::State, Json};

use service::dashboard::DashboardStats;

use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(get, path = "/dashboard", tag = "dashboard", security(("bearer" = [])),
    responses((status = 200, description = "Totals, last week's reviews and best rated clients")))]
pub async fn stats(State(state): State<ServerState>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.dashboard.stats().await?))
}
