use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AdminAccount, AdminChanges};
use super::errors::AuthError;

/// Persistence for admin accounts.
///
/// Emails reach the repository already normalized. `create` and `update`
/// report an email held by another admin as [`AuthError::Conflict`].
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AuthError>;
    async fn create(&self, name: &str, email: &str, password_hash: String) -> Result<AdminAccount, AuthError>;
    async fn update(&self, id: Uuid, changes: AdminChanges) -> Result<AdminAccount, AuthError>;
}

pub(crate) const EMAIL_TAKEN: &str = "email already in use";

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockAdminRepository {
        admins: Mutex<HashMap<Uuid, AdminAccount>>,
    }

    impl MockAdminRepository {
        fn admins(&self) -> Result<MutexGuard<'_, HashMap<Uuid, AdminAccount>>, AuthError> {
            self.admins.lock().map_err(|e| AuthError::Repository(e.to_string()))
        }

        fn email_taken(admins: &HashMap<Uuid, AdminAccount>, email: &str, except: Option<Uuid>) -> bool {
            admins.values().any(|a| a.email == email && Some(a.id) != except)
        }
    }

    #[async_trait]
    impl AdminRepository for MockAdminRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AuthError> {
            Ok(self.admins()?.values().find(|a| a.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AuthError> {
            Ok(self.admins()?.get(&id).cloned())
        }

        async fn create(&self, name: &str, email: &str, password_hash: String) -> Result<AdminAccount, AuthError> {
            let mut admins = self.admins()?;
            if Self::email_taken(&admins, email, None) {
                return Err(AuthError::Conflict(EMAIL_TAKEN.into()));
            }
            let account = AdminAccount {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                otp_code: None,
                otp_expires_at: None,
                reset_authorized_until: None,
                created_at: Utc::now(),
            };
            admins.insert(account.id, account.clone());
            Ok(account)
        }

        async fn update(&self, id: Uuid, changes: AdminChanges) -> Result<AdminAccount, AuthError> {
            let mut admins = self.admins()?;
            if let Some(email) = &changes.email {
                if Self::email_taken(&admins, email, Some(id)) {
                    return Err(AuthError::Conflict(EMAIL_TAKEN.into()));
                }
            }
            let account = admins.get_mut(&id).ok_or(AuthError::NotFound)?;
            if let Some(v) = changes.name { account.name = v; }
            if let Some(v) = changes.email { account.email = v; }
            if let Some(v) = changes.password_hash { account.password_hash = v; }
            if let Some(v) = changes.otp_code { account.otp_code = v; }
            if let Some(v) = changes.otp_expires_at { account.otp_expires_at = v; }
            if let Some(v) = changes.reset_authorized_until { account.reset_authorized_until = v; }
            Ok(account.clone())
        }
    }
}
