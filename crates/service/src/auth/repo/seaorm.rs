use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Set, SqlErr};
use uuid::Uuid;

use models::admin;

use crate::auth::domain::{AdminAccount, AdminChanges};
use crate::auth::errors::AuthError;
use crate::auth::repository::{AdminRepository, EMAIL_TAKEN};

pub struct SeaOrmAdminRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAdminRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn map_db_err(e: DbErr) -> AuthError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AuthError::Conflict(EMAIL_TAKEN.into()),
        _ => AuthError::Repository(e.to_string()),
    }
}

#[async_trait::async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AuthError> {
        let found = admin::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(AdminAccount::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AuthError> {
        let found = admin::Entity::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;
        Ok(found.map(AdminAccount::from))
    }

    async fn create(&self, name: &str, email: &str, password_hash: String) -> Result<AdminAccount, AuthError> {
        if admin::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?
            .is_some()
        {
            return Err(AuthError::Conflict(EMAIL_TAKEN.into()));
        }
        match admin::create(&self.db, name, email, password_hash).await {
            Ok(created) => Ok(created.into()),
            Err(models::errors::ModelError::Validation(msg)) => Err(AuthError::Validation(msg)),
            // a concurrent insert can still win the unique index
            Err(models::errors::ModelError::Db(msg)) if msg.contains("duplicate key") => {
                Err(AuthError::Conflict(EMAIL_TAKEN.into()))
            }
            Err(e) => Err(AuthError::Repository(e.to_string())),
        }
    }

    async fn update(&self, id: Uuid, changes: AdminChanges) -> Result<AdminAccount, AuthError> {
        let current = admin::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(AuthError::NotFound)?;

        let mut am = current.into_active_model();
        if let Some(v) = changes.name { am.name = Set(v); }
        if let Some(v) = changes.email { am.email = Set(v); }
        if let Some(v) = changes.password_hash { am.password_hash = Set(v); }
        if let Some(v) = changes.otp_code { am.otp_code = Set(v); }
        if let Some(v) = changes.otp_expires_at { am.otp_expires_at = Set(v.map(Into::into)); }
        if let Some(v) = changes.reset_authorized_until { am.reset_authorized_until = Set(v.map(Into::into)); }
        am.updated_at = Set(Utc::now().into());

        let saved = am.update(&self.db).await.map_err(map_db_err)?;
        Ok(saved.into())
    }
}
