use std::path::PathBuf;
use std::sync::Arc;

use service::auth::repository::AdminRepository;
use service::auth::{AuthConfig, AuthService};
use service::clients::repository::ClientRepository;
use service::clients::ClientService;
use service::dashboard::repository::DashboardRepository;
use service::dashboard::DashboardService;
use service::mailer::Mailer;
use service::reviews::repository::ReviewRepository;
use service::reviews::ReviewService;
use service::storage::LogoStore;

/// Shared handler state. Built once at startup, cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub clients: Arc<ClientService>,
    pub reviews: Arc<ReviewService>,
    pub dashboard: Arc<DashboardService>,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
}

/// Storage backends the services run on.
pub struct Repositories {
    pub admins: Arc<dyn AdminRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub dashboard: Arc<dyn DashboardRepository>,
}

/// Settings the HTTP layer needs besides the repositories.
pub struct StateSettings {
    pub auth: AuthConfig,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

impl ServerState {
    pub fn new(repos: Repositories, mailer: Arc<dyn Mailer>, logos: LogoStore, settings: StateSettings) -> Self {
        let uploads_dir = logos.dir().to_path_buf();
        Self {
            auth: Arc::new(AuthService::new(repos.admins, mailer.clone(), settings.auth)),
            clients: Arc::new(ClientService::new(repos.clients, logos, mailer, settings.public_base_url)),
            reviews: Arc::new(ReviewService::new(repos.reviews)),
            dashboard: Arc::new(DashboardService::new(repos.dashboard)),
            uploads_dir,
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}
