use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::{admin, client};

use crate::validation::{max_len, non_blank, Validate, ValidationError};

/// Raw client form values, as posted by the admin UI.
///
/// Every field is optional here; [`ClientDraft`] and [`ClientPatch`] decide
/// what is required. Field names accept the French keys of the original form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInput {
    #[serde(default, alias = "nom")]
    pub name: Option<String>,
    #[serde(default, alias = "langue")]
    pub language: Option<String>,
    #[serde(default, alias = "business_statut")]
    pub business_status: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default, alias = "page_publique_url")]
    pub public_url: Option<String>,
    #[serde(default, alias = "statut")]
    pub status: Option<String>,
    #[serde(default, alias = "contact_nom")]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default, alias = "contact_tel")]
    pub contact_phone: Option<String>,
    #[serde(default, alias = "notes_admin")]
    pub admin_notes: Option<String>,
}

impl ClientInput {
    /// Assign a form field by name. Returns `false` for unknown names.
    pub fn set_field(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "name" | "nom" => &mut self.name,
            "language" | "langue" => &mut self.language,
            "business_status" | "business_statut" => &mut self.business_status,
            "place_id" => &mut self.place_id,
            "public_url" | "page_publique_url" => &mut self.public_url,
            "status" | "statut" => &mut self.status,
            "contact_name" | "contact_nom" => &mut self.contact_name,
            "contact_email" => &mut self.contact_email,
            "contact_phone" | "contact_tel" => &mut self.contact_phone,
            "admin_notes" | "notes_admin" => &mut self.admin_notes,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Trim everything; blank means not supplied.
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            language: non_blank(self.language),
            business_status: non_blank(self.business_status),
            place_id: non_blank(self.place_id),
            public_url: non_blank(self.public_url),
            status: non_blank(self.status),
            contact_name: non_blank(self.contact_name),
            contact_email: non_blank(self.contact_email),
            contact_phone: non_blank(self.contact_phone),
            admin_notes: non_blank(self.admin_notes),
        }
    }

    fn validate_supplied(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            client::validate_name(name)?;
        }
        if let Some(language) = &self.language {
            client::validate_language(language)?;
        }
        if let Some(url) = &self.public_url {
            client::validate_public_url(url)?;
        }
        if let Some(email) = &self.contact_email {
            admin::validate_email(email).map_err(|_| ValidationError::new("invalid contact_email"))?;
        }
        max_len(self.business_status.as_deref(), 64, "business_status")?;
        max_len(self.place_id.as_deref(), 255, "place_id")?;
        max_len(self.status.as_deref(), 32, "status")?;
        max_len(self.contact_name.as_deref(), 255, "contact_name")?;
        max_len(self.contact_phone.as_deref(), 64, "contact_phone")?;
        max_len(self.admin_notes.as_deref(), 4000, "admin_notes")?;
        Ok(())
    }
}

/// Create input: `name` and `language` are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDraft(pub ClientInput);

impl Validate for ClientDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.0.name.is_none() || self.0.language.is_none() {
            return Err(ValidationError::new("name and language are required"));
        }
        self.0.validate_supplied()
    }
}

/// Update input: only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch(pub ClientInput);

impl Validate for ClientPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate_supplied()
    }
}

/// Row to insert.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
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
}

/// Column changes; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub language: Option<String>,
    pub business_status: Option<String>,
    pub place_id: Option<String>,
    pub public_url: Option<String>,
    pub status: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub admin_notes: Option<String>,
    pub logo: Option<String>,
}

/// Full client record as seen by admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Name used in greetings: the contact person if known, else the business.
    pub fn greeting_name(&self) -> &str {
        self.contact_name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or(&self.name)
    }
}

impl From<client::Model> for Client {
    fn from(m: client::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            language: m.language,
            business_status: m.business_status,
            place_id: m.place_id,
            public_url: m.public_url,
            status: m.status,
            contact_name: m.contact_name,
            contact_email: m.contact_email,
            contact_phone: m.contact_phone,
            admin_notes: m.admin_notes,
            logo: m.logo,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// What anonymous visitors of a public page may see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicClient {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
    pub language: String,
    pub place_id: Option<String>,
    pub public_url: String,
    pub status: String,
    pub business_status: Option<String>,
}

impl From<Client> for PublicClient {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            logo: c.logo,
            language: c.language,
            place_id: c.place_id,
            public_url: c.public_url,
            status: c.status,
            business_status: c.business_status,
        }
    }
}

/// Result of create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSaved {
    pub message: String,
    pub slug: String,
    pub client: Client,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_and_english_field_names() {
        let mut input = ClientInput::default();
        assert!(input.set_field("nom", "Chez Paul".into()));
        assert!(input.set_field("language", "fr".into()));
        assert!(input.set_field("contact_tel", "0102".into()));
        assert!(input.set_field("notes_admin", "vip".into()));
        assert!(!input.set_field("logo", "x".into()));
        assert_eq!(input.name.as_deref(), Some("Chez Paul"));
        assert_eq!(input.contact_phone.as_deref(), Some("0102"));
        assert_eq!(input.admin_notes.as_deref(), Some("vip"));

        let parsed: ClientInput = serde_json::from_str(r#"{"nom":"A","langue":"fr","statut":"paused"}"#).unwrap();
        assert_eq!(parsed.language.as_deref(), Some("fr"));
        assert_eq!(parsed.status.as_deref(), Some("paused"));
    }

    #[test]
    fn draft_requires_name_and_language() {
        let draft = ClientDraft(ClientInput { name: Some("A".into()), language: None, ..Default::default() }.normalized());
        assert_eq!(draft.validate().unwrap_err().to_string(), "name and language are required");
        let blank = ClientDraft(ClientInput { name: Some("  ".into()), language: Some("fr".into()), ..Default::default() }.normalized());
        assert!(blank.validate().is_err());
        let ok = ClientDraft(ClientInput { name: Some("A".into()), language: Some("fr".into()), ..Default::default() }.normalized());
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn patch_checks_only_supplied_fields() {
        assert!(ClientPatch::default().validate().is_ok());
        let bad_url = ClientPatch(ClientInput { public_url: Some("nope".into()), ..Default::default() });
        assert!(bad_url.validate().is_err());
        let bad_mail = ClientPatch(ClientInput { contact_email: Some("nope".into()), ..Default::default() });
        assert_eq!(bad_mail.validate().unwrap_err().to_string(), "invalid contact_email");
    }
}
