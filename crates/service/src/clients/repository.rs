use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Client, ClientChanges, NewClient};
use crate::errors::ServiceError;

/// Persistence for clients.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// All clients, newest first.
    async fn list(&self) -> Result<Vec<Client>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Client>, ServiceError>;
    /// Whether a client other than `except` uses `name`.
    async fn name_taken(&self, name: &str, except: Option<Uuid>) -> Result<bool, ServiceError>;
    /// Whether a client other than `except` holds `slug`.
    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, ServiceError>;
    async fn insert(&self, client: NewClient) -> Result<Client, ServiceError>;
    async fn update(&self, id: Uuid, changes: ClientChanges) -> Result<Client, ServiceError>;
    /// Delete and return the removed row; its reviews go with it.
    async fn delete(&self, id: Uuid) -> Result<Option<Client>, ServiceError>;
}

pub(crate) const NAME_TAKEN: &str = "a client with this name already exists";
