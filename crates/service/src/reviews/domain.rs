use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::avis;

use crate::validation::{max_len, non_blank, Validate, ValidationError};

/// Review as posted on a public page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    #[serde(default, alias = "note")]
    pub rating: Option<i64>,
    #[serde(default, alias = "commentaire")]
    pub comment: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

impl NewReview {
    pub fn normalized(self) -> Self {
        Self { rating: self.rating, comment: non_blank(self.comment), contact: non_blank(self.contact) }
    }
}

impl Validate for NewReview {
    fn validate(&self) -> Result<(), ValidationError> {
        let rating = avis::validate_rating(self.rating)?;
        avis::validate_comment(rating, self.comment.as_deref())?;
        max_len(self.comment.as_deref(), 5000, "comment")?;
        max_len(self.contact.as_deref(), 255, "contact")?;
        Ok(())
    }
}

/// Validated review ready to store.
#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub client_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub client_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub contact: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<avis::Model> for Review {
    fn from(m: avis::Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            rating: m.rating,
            comment: m.comment,
            contact: m.contact,
            submitted_at: m.submitted_at.with_timezone(&Utc),
        }
    }
}

/// Admin listing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewWithClient {
    #[serde(flatten)]
    pub review: Review,
    pub client_name: String,
}
