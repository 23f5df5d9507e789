pub mod admin;
pub mod clients;
pub mod dashboard;
pub mod public;
pub mod reviews;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth::require_bearer;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health::OK)
}

/// Build the full application router: public pages, admin-only routes,
/// uploaded logos and the API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // No credentials needed
    let open = Router::new()
        .route("/health", get(health))
        .route("/admin/register", post(admin::register))
        .route("/admin/login", post(admin::login))
        .route("/admin/forgot-password", post(admin::forgot_password))
        .route("/admin/verify-otp", post(admin::verify_otp))
        .route("/admin/reset-password", post(admin::reset_password))
        .route("/clients/:client/avis", get(reviews::list_for_client).post(reviews::submit))
        .route("/public/:slug", get(public::client_page));

    // Bearer token required
    let protected = Router::new()
        .route("/admin/me", get(admin::me).put(admin::update_me))
        .route("/clients", get(clients::list).post(clients::create))
        .route("/clients/:client", get(clients::get).put(clients::update).delete(clients::delete))
        .route("/avis", get(reviews::list_all))
        .route("/avis/:id", delete(reviews::delete))
        .route("/dashboard", get(dashboard::stats))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let uploads = ServeDir::new(&state.uploads_dir);

    Router::new()
        .merge(open)
        .merge(protected)
        .nest_service("/uploads", uploads)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
