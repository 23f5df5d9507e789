//! Database-backed entity tests. They run only when `DATABASE_URL` points at a
//! disposable Postgres database and `SKIP_DB_TESTS` is unset.

/// CRUD operations on admins, clients and reviews
pub mod crud_tests;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::db::connect;

static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// `None` when no database is configured for tests.
pub(crate) async fn test_db() -> anyhow::Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    // Run migrations exactly once, with a throwaway connection
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
