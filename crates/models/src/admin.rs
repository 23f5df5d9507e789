use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub otp_code: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<DateTimeWithTimeZone>,
    #[serde(skip_serializing)]
    pub reset_authorized_until: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Emails are compared case-insensitively; store them folded.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ModelError::validation("invalid email"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(ModelError::validation("invalid email"));
    }
    if email.len() > 255 {
        return Err(ModelError::validation("email too long (<=255)"));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::validation("name required"));
    }
    if name.trim().chars().count() > 128 {
        return Err(ModelError::validation("name too long (<=128)"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ModelError::validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, name: &str, email: &str, password_hash: String) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_email(email)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::validation("password hash required"));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        email: Set(normalize_email(email)),
        password_hash: Set(password_hash),
        otp_code: Set(None),
        otp_expires_at: Set(None),
        reset_authorized_until: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}
