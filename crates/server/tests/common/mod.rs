#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use server::routes;
use server::state::{Repositories, ServerState, StateSettings};
use service::auth::repository::mock::MockAdminRepository;
use service::auth::AuthConfig;
use service::mailer::mock::RecordingMailer;
use service::memory::InMemoryStore;
use service::storage::LogoStore;

pub const BASE_URL: &str = "http://reviews.test";
pub const BOUNDARY: &str = "X-TEST-BOUNDARY";

pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub store: Arc<InMemoryStore>,
    pub uploads: PathBuf,
}

pub async fn test_app() -> TestApp {
    test_app_with_limit(1024 * 1024).await
}

pub async fn test_app_with_limit(max_upload_bytes: usize) -> TestApp {
    let uploads = std::env::temp_dir().join(format!("server_test_uploads_{}", Uuid::new_v4()));
    let logos = LogoStore::new(uploads.clone()).await.expect("create uploads dir");
    let mailer = Arc::new(RecordingMailer::default());
    let store = Arc::new(InMemoryStore::default());
    let repos = Repositories {
        admins: Arc::new(MockAdminRepository::default()),
        clients: store.clone(),
        reviews: store.clone(),
        dashboard: store.clone(),
    };
    let settings = StateSettings {
        auth: AuthConfig {
            jwt_secret: "test-secret".into(),
            token_ttl: chrono::Duration::hours(1),
            otp_ttl: chrono::Duration::minutes(10),
            allow_registration: true,
        },
        public_base_url: BASE_URL.into(),
        max_upload_bytes,
    };
    let state = ServerState::new(repos, mailer.clone(), logos, settings);
    let router = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive());
    TestApp { router, mailer, store, uploads }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.expect("router is infallible");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, body)
    }

    /// Register an admin and return a bearer token for it.
    pub async fn admin_token(&self) -> String {
        let email = format!("admin_{}@example.com", Uuid::new_v4());
        let (status, _) = self
            .send(json_request("POST", "/admin/register", None, serde_json::json!({"name": "Admin", "email": email, "password": "S3curePass!"})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self
            .send(json_request("POST", "/admin/login", None, serde_json::json!({"email": email, "password": "S3curePass!"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("token").to_string()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    bare("GET", uri, token)
}

pub fn bare(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).expect("request")
}

/// Hand-built multipart form: text fields plus an optional `(file name, bytes)` logo.
pub fn multipart_body(fields: &[(&str, &str)], logo: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes());
    }
    if let Some((file_name, bytes)) = logo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(method: &str, uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request")
}

/// Code embedded in the last reset email sent to `to`.
pub fn otp_sent_to(mailer: &RecordingMailer, to: &str) -> String {
    let html = mailer.last_to(to).expect("otp email").html;
    let start = html.find("<strong>").expect("code start") + "<strong>".len();
    let end = html[start..].find("</strong>").expect("code end") + start;
    html[start..end].to_string()
}
