use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repository::DashboardRepository;
use crate::errors::ServiceError;
use crate::reviews::domain::ReviewWithClient;

/// Window for "recent" reviews.
pub const RECENT_DAYS: i64 = 7;
/// Minimum average rating to appear among top clients.
pub const TOP_CLIENT_MIN_AVERAGE: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopClient {
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    /// Two decimals, e.g. `"4.50"`.
    pub average: String,
    pub review_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub total_reviews: i64,
    /// Two decimals; `"0.00"` when there are no reviews.
    pub average_rating: String,
    pub recent_reviews: Vec<ReviewWithClient>,
    pub top_clients: Vec<TopClient>,
}

pub struct DashboardService<R: DashboardRepository + ?Sized = dyn DashboardRepository> {
    repo: Arc<R>,
}

impl<R: DashboardRepository + ?Sized> DashboardService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        let totals = self.repo.totals().await?;
        let recent_reviews = self.repo.reviews_since(Utc::now() - Duration::days(RECENT_DAYS)).await?;
        let top_clients = self
            .repo
            .clients_with_average_at_least(TOP_CLIENT_MIN_AVERAGE)
            .await?
            .into_iter()
            .map(|c| TopClient {
                id: c.id,
                name: c.name,
                logo: c.logo,
                average: format_average(Some(c.average)),
                review_count: c.review_count,
            })
            .collect();

        Ok(DashboardStats {
            total_clients: totals.total_clients,
            total_reviews: totals.total_reviews,
            average_rating: format_average(totals.average_rating),
            recent_reviews,
            top_clients,
        })
    }
}

pub fn format_average(avg: Option<f64>) -> String {
    format!("{:.2}", avg.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::reviews::domain::NewReview;
    use crate::reviews::ReviewService;

    #[test]
    fn averages_have_two_decimals() {
        assert_eq!(format_average(None), "0.00");
        assert_eq!(format_average(Some(4.0)), "4.00");
        assert_eq!(format_average(Some(13.0 / 3.0)), "4.33");
    }

    #[tokio::test]
    async fn empty_store() {
        let svc = DashboardService::new(Arc::new(InMemoryStore::default()));
        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.total_clients, 0);
        assert_eq!(stats.average_rating, "0.00");
        assert!(stats.recent_reviews.is_empty());
        assert!(stats.top_clients.is_empty());
    }

    #[tokio::test]
    async fn totals_recent_and_top_clients() {
        let store = Arc::new(InMemoryStore::default());
        store.seed_client("Good", "good");
        store.seed_client("Mixed", "mixed");
        store.seed_client("Quiet", "quiet");
        let reviews = ReviewService::new(store.clone());
        for (slug, rating, comment) in [("good", 5, None), ("good", 4, None), ("mixed", 5, None), ("mixed", 1, Some("meh"))] {
            reviews
                .submit(slug, NewReview { rating: Some(rating), comment: comment.map(Into::into), contact: None })
                .await
                .unwrap();
        }

        let stats = DashboardService::new(store).stats().await.unwrap();
        assert_eq!(stats.total_clients, 3);
        assert_eq!(stats.total_reviews, 4);
        assert_eq!(stats.average_rating, "3.75");
        assert_eq!(stats.recent_reviews.len(), 4);
        assert_eq!(stats.recent_reviews[0].client_name, "Mixed");
        assert_eq!(stats.top_clients.len(), 1);
        assert_eq!(stats.top_clients[0].name, "Good");
        assert_eq!(stats.top_clients[0].average, "4.50");
    }
}
