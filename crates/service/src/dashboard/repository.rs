use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseBackend, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, Statement,
};
use uuid::Uuid;

use models::{avis, client};

use crate::errors::ServiceError;
use crate::reviews::domain::ReviewWithClient;

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct Totals {
    pub total_clients: i64,
    pub total_reviews: i64,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ClientAverage {
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub average: f64,
    pub review_count: i64,
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn totals(&self) -> Result<Totals, ServiceError>;
    /// Reviews submitted at or after `since`, newest first.
    async fn reviews_since(&self, since: DateTime<Utc>) -> Result<Vec<ReviewWithClient>, ServiceError>;
    /// Clients whose average rating is at least `min_average`, best first.
    async fn clients_with_average_at_least(&self, min_average: f64) -> Result<Vec<ClientAverage>, ServiceError>;
}

pub struct SeaOrmDashboardRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmDashboardRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

const TOTALS_SQL: &str = r#"
SELECT
    (SELECT COUNT(*) FROM clients) AS total_clients,
    (SELECT COUNT(*) FROM avis) AS total_reviews,
    (SELECT AVG(rating)::float8 FROM avis) AS average_rating
"#;

const TOP_CLIENTS_SQL: &str = r#"
SELECT c.id, c.name, c.logo, AVG(a.rating)::float8 AS average, COUNT(a.id) AS review_count
FROM clients c
JOIN avis a ON a.client_id = c.id
GROUP BY c.id, c.name, c.logo
HAVING AVG(a.rating) >= $1
ORDER BY average DESC, c.name ASC
"#;

#[async_trait]
impl DashboardRepository for SeaOrmDashboardRepository {
    async fn totals(&self) -> Result<Totals, ServiceError> {
        Totals::find_by_statement(Statement::from_string(DatabaseBackend::Postgres, TOTALS_SQL))
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?
            .ok_or_else(|| ServiceError::Db("empty totals row".into()))
    }

    async fn reviews_since(&self, since: DateTime<Utc>) -> Result<Vec<ReviewWithClient>, ServiceError> {
        let rows = avis::Entity::find()
            .filter(avis::Column::SubmittedAt.gte(since))
            .find_also_related(client::Entity)
            .order_by_desc(avis::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows
            .into_iter()
            .map(|(review, owner)| ReviewWithClient {
                review: review.into(),
                client_name: owner.map(|c| c.name).unwrap_or_default(),
            })
            .collect())
    }

    async fn clients_with_average_at_least(&self, min_average: f64) -> Result<Vec<ClientAverage>, ServiceError> {
        ClientAverage::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            TOP_CLIENTS_SQL,
            [min_average.into()],
        ))
        .all(&self.db)
        .await
        .map_err(ServiceError::db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn aggregate_queries_run() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmDashboardRepository::new(db);
        let totals = repo.totals().await?;
        assert!(totals.total_clients >= 0);
        assert_eq!(totals.average_rating.is_none(), totals.total_reviews == 0);

        let recent = repo.reviews_since(Utc::now() - chrono::Duration::days(7)).await?;
        assert!(recent.windows(2).all(|w| w[0].review.submitted_at >= w[1].review.submitted_at));

        let top = repo.clients_with_average_at_least(4.0).await?;
        assert!(top.iter().all(|c| c.average >= 4.0 && c.review_count > 0));
        Ok(())
    }
}
