use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use models::{avis, client};

use crate::errors::ServiceError;
use crate::reviews::domain::{Review, ReviewRecord, ReviewWithClient};
use crate::reviews::repository::ReviewRepository;

pub struct SeaOrmReviewRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// The owning client can disappear between the slug lookup and the insert.
fn map_insert_err(e: DbErr) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::not_found("client"),
        _ => ServiceError::db(e),
    }
}

#[async_trait::async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn client_id_for_slug(&self, slug: &str) -> Result<Option<Uuid>, ServiceError> {
        client::Entity::find()
            .select_only()
            .column(client::Column::Id)
            .filter(client::Column::Slug.eq(slug))
            .into_tuple::<Uuid>()
            .one(&self.db)
            .await
            .map_err(ServiceError::db)
    }

    async fn insert(&self, r: ReviewRecord) -> Result<Review, ServiceError> {
        let am = avis::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(r.client_id),
            rating: Set(r.rating),
            comment: Set(r.comment),
            contact: Set(r.contact),
            submitted_at: Set(Utc::now().into()),
        };
        let saved = am.insert(&self.db).await.map_err(map_insert_err)?;
        Ok(saved.into())
    }

    async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Review>, ServiceError> {
        let rows = avis::Entity::find()
            .filter(avis::Column::ClientId.eq(client_id))
            .order_by_desc(avis::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<ReviewWithClient>, ServiceError> {
        let rows = avis::Entity::find()
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

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = avis::Entity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::db)?;
        Ok(res.rows_affected > 0)
    }
}
