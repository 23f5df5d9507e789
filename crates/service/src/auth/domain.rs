use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::admin;

use crate::validation::{non_blank, required, Validate, ValidationError};

/// Registration input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default, alias = "nom")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterInput {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::new("name, email and password are required"));
        }
        admin::validate_name(&self.name)?;
        admin::validate_email(&self.email)?;
        admin::validate_password(&self.password)?;
        Ok(())
    }
}

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginInput {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::new("email and password are required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgotPasswordInput {
    #[serde(default)]
    pub email: String,
}

impl Validate for ForgotPasswordInput {
    fn validate(&self) -> Result<(), ValidationError> {
        required(&self.email, "email is required")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyOtpInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

impl Validate for VerifyOtpInput {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.otp.trim().is_empty() {
            return Err(ValidationError::new("email and otp are required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetPasswordInput {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "newPassword")]
    pub new_password: String,
}

impl Validate for ResetPasswordInput {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.new_password.is_empty() {
            return Err(ValidationError::new("email and new password are required"));
        }
        admin::validate_password(&self.new_password)?;
        Ok(())
    }
}

/// Partial profile update; blank fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileInput {
    #[serde(default, alias = "nom")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateProfileInput {
    /// Drop blank values so only real changes remain.
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            email: non_blank(self.email),
            password: self.password.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

impl Validate for UpdateProfileInput {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::new("nothing to update"));
        }
        if let Some(name) = &self.name {
            admin::validate_name(name)?;
        }
        if let Some(email) = &self.email {
            admin::validate_email(email)?;
        }
        if let Some(password) = &self.password {
            admin::validate_password(password)?;
        }
        Ok(())
    }
}

/// What `GET /admin/me` exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Stored admin, secrets included. Never serialized.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub reset_authorized_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AdminAccount {
    pub fn profile(&self) -> AdminProfile {
        AdminProfile { id: self.id, name: self.name.clone(), email: self.email.clone() }
    }
}

impl From<admin::Model> for AdminAccount {
    fn from(m: admin::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            password_hash: m.password_hash,
            otp_code: m.otp_code,
            otp_expires_at: m.otp_expires_at.map(|t| t.with_timezone(&Utc)),
            reset_authorized_until: m.reset_authorized_until.map(|t| t.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

/// Column changes for one admin row. `None` leaves a column untouched;
/// `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct AdminChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub otp_code: Option<Option<String>>,
    pub otp_expires_at: Option<Option<DateTime<Utc>>>,
    pub reset_authorized_until: Option<Option<DateTime<Utc>>>,
}

/// JWT payload carried by admin bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin id
    pub sub: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl AdminClaims {
    pub fn admin_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub name: String,
    pub email: String,
}
