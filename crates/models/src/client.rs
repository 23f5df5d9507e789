use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{avis, errors::ModelError};

pub const DEFAULT_STATUS: &str = "active";
/// Matches the `clients.public_url` column width.
pub const MAX_PUBLIC_URL_LEN: usize = 512;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub language: String,
    pub business_status: Option<String>,
    pub place_id: Option<String>,
    pub public_url: String,
    pub status: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub admin_notes: Option<String>,
    pub logo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Avis }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Avis => Entity::has_many(avis::Entity).into(),
        }
    }
}

impl Related<avis::Entity> for Entity {
    fn to() -> RelationDef { Relation::Avis.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Public page address for a slug, e.g. `http://localhost:3000/public/acme`.
pub fn default_public_url(base_url: &str, slug: &str) -> String {
    format!("{}/public/{}", base_url.trim_end_matches('/'), slug)
}

/// Reviews page address for a slug.
pub fn reviews_url(base_url: &str, slug: &str) -> String {
    format!("{}/avis", default_public_url(base_url, slug))
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::validation("name and language are required"));
    }
    if name.trim().chars().count() > 255 {
        return Err(ModelError::validation("name too long (<=255)"));
    }
    Ok(())
}

pub fn validate_language(language: &str) -> Result<(), ModelError> {
    if language.trim().is_empty() {
        return Err(ModelError::validation("name and language are required"));
    }
    if language.trim().chars().count() > 16 {
        return Err(ModelError::validation("language code too long (<=16)"));
    }
    Ok(())
}

pub fn validate_public_url(url: &str) -> Result<(), ModelError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ModelError::validation("public_url must start with http(s)"));
    }
    if url.chars().count() > MAX_PUBLIC_URL_LEN {
        return Err(ModelError::validation(format!("public_url too long (<={MAX_PUBLIC_URL_LEN})")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_urls() {
        assert_eq!(default_public_url("http://localhost:3000", "acme"), "http://localhost:3000/public/acme");
        assert_eq!(default_public_url("https://x.test/", "acme-1"), "https://x.test/public/acme-1");
        assert_eq!(reviews_url("http://localhost:3000", "acme"), "http://localhost:3000/public/acme/avis");
    }

    #[test]
    fn required_fields() {
        assert!(validate_name("  ").is_err());
        assert!(validate_language("").is_err());
        assert!(validate_language("fr").is_ok());
        assert!(validate_public_url("ftp://nope").is_err());
    }

    #[test]
    fn public_url_length_is_capped() {
        let fits = format!("https://x.test/{}", "p".repeat(MAX_PUBLIC_URL_LEN - "https://x.test/".len()));
        assert!(validate_public_url(&fits).is_ok());
        let too_long = format!("{fits}q");
        assert!(validate_public_url(&too_long).is_err());
    }
}
