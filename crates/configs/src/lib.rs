use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub public: PublicConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Allowed CORS origins; empty means permissive.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 5000, worker_threads: Some(4), cors_origins: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "default_otp_ttl_minutes")]
    pub otp_ttl_minutes: i64,
    #[serde(default = "default_true")]
    pub allow_registration: bool,
}

fn default_token_ttl_hours() -> i64 { 8 }
fn default_otp_ttl_minutes() -> i64 { 10 }

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
            otp_ttl_minutes: default_otp_ttl_minutes(),
            allow_registration: true,
        }
    }
}

/// SMTP relay settings. An empty `host` disables delivery (messages are logged).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Sender mailbox; falls back to `username`.
    #[serde(default)]
    pub from: String,
    /// Use STARTTLS (typically port 587) instead of implicit TLS.
    #[serde(default)]
    pub starttls: bool,
}

impl SmtpConfig {
    pub fn is_enabled(&self) -> bool {
        !self.host.trim().is_empty()
    }

    pub fn sender(&self) -> &str {
        if self.from.trim().is_empty() { &self.username } else { &self.from }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_uploads_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,
}

fn default_uploads_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_max_upload_bytes() -> usize { 5 * 1024 * 1024 }

impl Default for UploadsConfig {
    fn default() -> Self {
        Self { dir: default_uploads_dir(), max_bytes: default_max_upload_bytes() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicConfig {
    /// Base URL of the public front end, used for `public_url` and email links.
    #[serde(default = "default_public_base_url")]
    pub base_url: String,
}

fn default_public_base_url() -> String { "http://localhost:3000".into() }

impl Default for PublicConfig {
    fn default() -> Self {
        Self { base_url: default_public_base_url() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String { "compact".into() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

/// Load from `CONFIG_PATH` (default `config.toml`). A missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => parse(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File (or defaults), then process environment, then validation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env_with(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment-style variables provided by `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty("SERVER_PORT").or_else(|| non_empty("PORT")) {
            match port.trim().parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!(%port, "ignoring unparsable port from environment"),
            }
        }
        if let Some(origins) = non_empty("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(url) = non_empty("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = non_empty("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(host) = non_empty("SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(port) = non_empty("SMTP_PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.smtp.port = Some(port);
        }
        if let Some(user) = non_empty("SMTP_USER") {
            self.smtp.username = user;
        }
        if let Some(pass) = non_empty("SMTP_PASS") {
            self.smtp.password = pass;
        }
        if let Some(from) = non_empty("SMTP_FROM") {
            self.smtp.from = from;
        }
        if let Some(dir) = non_empty("UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(dir);
        }
        if let Some(base) = non_empty("PUBLIC_BASE_URL") {
            self.public.base_url = base;
        }
        if let Some(format) = non_empty("LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.normalize()?;
        self.uploads.validate()?;
        self.public.normalize()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            warn!("JWT secret not configured; falling back to an insecure development secret");
            self.jwt_secret = DEV_JWT_SECRET.to_string();
        }
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        if self.otp_ttl_minutes <= 0 {
            return Err(anyhow!("auth.otp_ttl_minutes must be positive"));
        }
        Ok(())
    }
}

impl UploadsConfig {
    fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(anyhow!("uploads.dir must not be empty"));
        }
        if self.max_bytes == 0 {
            return Err(anyhow!("uploads.max_bytes must be positive"));
        }
        Ok(())
    }
}

impl PublicConfig {
    fn normalize(&mut self) -> Result<()> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(anyhow!("public.base_url must start with http(s)://"));
        }
        self.base_url = trimmed.to_string();
        Ok(())
    }
}
