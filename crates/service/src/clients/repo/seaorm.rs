use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use models::client::{self, Column, Entity};

use crate::clients::domain::{Client, ClientChanges, NewClient};
use crate::clients::repository::{ClientRepository, NAME_TAKEN};
use crate::errors::ServiceError;

pub struct SeaOrmClientRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmClientRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn map_db_err(e: DbErr) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("slug") => {
            ServiceError::Conflict("slug already in use".into())
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(NAME_TAKEN.into()),
        _ => ServiceError::db(e),
    }
}

#[async_trait::async_trait]
impl ClientRepository for SeaOrmClientRepository {
    async fn list(&self) -> Result<Vec<Client>, ServiceError> {
        let rows = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError> {
        let row = Entity::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;
        Ok(row.map(Client::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Client>, ServiceError> {
        let row = Entity::find()
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Client::from))
    }

    async fn name_taken(&self, name: &str, except: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut q = Entity::find().filter(Column::Name.eq(name));
        if let Some(id) = except {
            q = q.filter(Column::Id.ne(id));
        }
        Ok(q.count(&self.db).await.map_err(map_db_err)? > 0)
    }

    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut q = Entity::find().filter(Column::Slug.eq(slug));
        if let Some(id) = except {
            q = q.filter(Column::Id.ne(id));
        }
        Ok(q.count(&self.db).await.map_err(map_db_err)? > 0)
    }

    async fn insert(&self, c: NewClient) -> Result<Client, ServiceError> {
        let now = Utc::now().into();
        let am = client::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(c.name),
            slug: Set(c.slug),
            language: Set(c.language),
            business_status: Set(c.business_status),
            place_id: Set(c.place_id),
            public_url: Set(c.public_url),
            status: Set(c.status),
            contact_name: Set(c.contact_name),
            contact_email: Set(c.contact_email),
            contact_phone: Set(c.contact_phone),
            admin_notes: Set(c.admin_notes),
            logo: Set(c.logo),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = am.insert(&self.db).await.map_err(map_db_err)?;
        Ok(saved.into())
    }

    async fn update(&self, id: Uuid, ch: ClientChanges) -> Result<Client, ServiceError> {
        let current = Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| ServiceError::not_found("client"))?;

        let mut am = current.into_active_model();
        if let Some(v) = ch.name { am.name = Set(v); }
        if let Some(v) = ch.slug { am.slug = Set(v); }
        if let Some(v) = ch.language { am.language = Set(v); }
        if let Some(v) = ch.business_status { am.business_status = Set(Some(v)); }
        if let Some(v) = ch.place_id { am.place_id = Set(Some(v)); }
        if let Some(v) = ch.public_url { am.public_url = Set(v); }
        if let Some(v) = ch.status { am.status = Set(v); }
        if let Some(v) = ch.contact_name { am.contact_name = Set(Some(v)); }
        if let Some(v) = ch.contact_email { am.contact_email = Set(Some(v)); }
        if let Some(v) = ch.contact_phone { am.contact_phone = Set(Some(v)); }
        if let Some(v) = ch.admin_notes { am.admin_notes = Set(Some(v)); }
        if let Some(v) = ch.logo { am.logo = Set(Some(v)); }
        am.updated_at = Set(Utc::now().into());

        let saved = am.update(&self.db).await.map_err(map_db_err)?;
        Ok(saved.into())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Client>, ServiceError> {
        let Some(row) = Entity::find_by_id(id).one(&self.db).await.map_err(map_db_err)? else {
            return Ok(None);
        };
        let removed: Client = row.clone().into();
        row.delete(&self.db).await.map_err(map_db_err)?;
        Ok(Some(removed))
    }
}
