use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Review, ReviewRecord, ReviewWithClient};
use crate::errors::ServiceError;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Id of the client owning `slug`.
    async fn client_id_for_slug(&self, slug: &str) -> Result<Option<Uuid>, ServiceError>;
    async fn insert(&self, review: ReviewRecord) -> Result<Review, ServiceError>;
    /// One client's reviews, newest first.
    async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Review>, ServiceError>;
    /// Every review with its client's name, newest first.
    async fn list_all(&self) -> Result<Vec<ReviewWithClient>, ServiceError>;
    /// Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
