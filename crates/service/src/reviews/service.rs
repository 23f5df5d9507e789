use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{NewReview, Review, ReviewRecord, ReviewWithClient};
use super::repository::ReviewRepository;
use crate::errors::ServiceError;
use crate::validation::Validate;

pub struct ReviewService<R: ReviewRepository + ?Sized = dyn ReviewRepository> {
    repo: Arc<R>,
}

impl<R: ReviewRepository + ?Sized> ReviewService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate then store a review for the client owning `slug`.
    ///
    /// Input problems are reported before the slug is looked up.
    #[instrument(skip(self, input), fields(rating = ?input.rating))]
    pub async fn submit(&self, slug: &str, input: NewReview) -> Result<Review, ServiceError> {
        let input = input.normalized();
        input.validate()?;
        let rating = models::avis::validate_rating(input.rating)?;

        let client_id = self
            .repo
            .client_id_for_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::not_found("client"))?;
        let review = self
            .repo
            .insert(ReviewRecord { client_id, rating, comment: input.comment, contact: input.contact })
            .await?;
        info!(review_id = %review.id, client_id = %client_id, rating, "review_submitted");
        Ok(review)
    }

    pub async fn list_for_slug(&self, slug: &str) -> Result<Vec<Review>, ServiceError> {
        let client_id = self
            .repo
            .client_id_for_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::not_found("client"))?;
        self.repo.list_for_client(client_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<ReviewWithClient>, ServiceError> {
        self.repo.list_all().await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("review"));
        }
        info!(review_id = %id, "review_deleted");
        Ok(())
    }
}
