#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::connect;

use crate::storage::LogoStore;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Fresh connection to the test database, or `None` when none is configured.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            match connect().await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(_) => false,
            }
        })
        .await;
    if !migrated {
        anyhow::bail!("could not migrate test database");
    }
    Ok(Some(connect().await?))
}

/// Logo store in a directory unique to the calling test.
pub async fn temp_logo_store() -> LogoStore {
    let dir = std::env::temp_dir().join(format!("svc_test_logos_{}", uuid::Uuid::new_v4()));
    LogoStore::new(dir).await.expect("create temp logo dir")
}
