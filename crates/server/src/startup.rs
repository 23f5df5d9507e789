use std::{net::SocketAddr, sync::Arc};

use axum::http::{HeaderValue, Method};
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use service::auth::repo::SeaOrmAdminRepository;
use service::auth::AuthConfig;
use service::clients::repo::SeaOrmClientRepository;
use service::dashboard::repository::SeaOrmDashboardRepository;
use service::reviews::repo::SeaOrmReviewRepository;
use service::storage::LogoStore;

use crate::routes;
use crate::state::{Repositories, ServerState, StateSettings};

/// Permissive CORS unless explicit origins are configured.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Wire the SeaORM repositories, mailer and logo store into handler state.
pub async fn build_state(cfg: &AppConfig, db: DatabaseConnection) -> anyhow::Result<ServerState> {
    let mailer = service::mailer::from_config(&cfg.smtp)?;
    let logos = LogoStore::new(cfg.uploads.dir.clone()).await?;
    let repos = Repositories {
        admins: Arc::new(SeaOrmAdminRepository::new(db.clone())),
        clients: Arc::new(SeaOrmClientRepository::new(db.clone())),
        reviews: Arc::new(SeaOrmReviewRepository::new(db.clone())),
        dashboard: Arc::new(SeaOrmDashboardRepository::new(db)),
    };
    let settings = StateSettings {
        auth: AuthConfig::from_settings(&cfg.auth),
        public_base_url: cfg.public.base_url.clone(),
        max_upload_bytes: cfg.uploads.max_bytes,
    };
    Ok(ServerState::new(repos, mailer, logos, settings))
}

/// Public entry: load configuration, then serve until Ctrl+C or SIGTERM.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate()?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_uploads_dir(&cfg.uploads.dir).await?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("database migrations applied");
    }

    let state = build_state(&cfg, db.clone()).await?;
    let app = routes::build_router(state, build_cors(&cfg.server.cors_origins));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, public_base_url = %cfg.public.base_url, "server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    db.close().await?;
    info!("database pool closed");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
