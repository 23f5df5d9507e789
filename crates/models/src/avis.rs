use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{client, errors::ModelError};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
/// Ratings at or below this need a written comment.
pub const COMMENT_REQUIRED_AT_OR_BELOW: i16 = 3;

pub const RATING_OUT_OF_RANGE: &str = "rating must be between 1 and 5";
pub const COMMENT_REQUIRED: &str = "comment is required for ratings of 3 or less";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "avis")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub contact: Option<String>,
    pub submitted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Client }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(client::Entity)
                .from(Column::ClientId)
                .to(client::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<client::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Accepts any integer and narrows it once it is known to be in range.
pub fn validate_rating(rating: Option<i64>) -> Result<i16, ModelError> {
    match rating {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Ok(r as i16),
        _ => Err(ModelError::validation(RATING_OUT_OF_RANGE)),
    }
}

pub fn requires_comment(rating: i16) -> bool {
    rating <= COMMENT_REQUIRED_AT_OR_BELOW
}

pub fn validate_comment(rating: i16, comment: Option<&str>) -> Result<(), ModelError> {
    let blank = comment.map(|c| c.trim().is_empty()).unwrap_or(true);
    if requires_comment(rating) && blank {
        return Err(ModelError::validation(COMMENT_REQUIRED));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        for r in 1..=5 {
            assert_eq!(validate_rating(Some(r)).unwrap(), r as i16);
        }
        for r in [-1, 0, 6, 10, i64::MAX, i64::MIN] {
            assert!(validate_rating(Some(r)).is_err(), "rating {r} accepted");
        }
        assert!(validate_rating(None).is_err());
    }

    #[test]
    fn low_ratings_need_a_comment() {
        for r in 1..=3 {
            assert!(validate_comment(r, None).is_err());
            assert!(validate_comment(r, Some("   ")).is_err());
            assert!(validate_comment(r, Some("cold food")).is_ok());
        }
        for r in 4..=5 {
            assert!(validate_comment(r, None).is_ok());
        }
    }

    #[test]
    fn messages_are_stable() {
        assert_eq!(validate_rating(Some(9)).unwrap_err().to_string(), RATING_OUT_OF_RANGE);
        assert_eq!(validate_comment(2, None).unwrap_err().to_string(), COMMENT_REQUIRED);
    }
}
