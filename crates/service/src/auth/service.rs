use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::{rngs::OsRng, Rng};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::admin::normalize_email;

use super::domain::{
    AdminAccount, AdminChanges, AdminClaims, AdminProfile, AuthSession, ForgotPasswordInput, LoginInput,
    RegisterInput, ResetPasswordInput, UpdateProfileInput, VerifyOtpInput,
};
use super::errors::AuthError;
use super::repository::AdminRepository;
use crate::mailer::{templates, Mailer};
use crate::validation::Validate;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub otp_ttl: Duration,
    pub allow_registration: bool,
}

impl AuthConfig {
    pub fn from_settings(cfg: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            token_ttl: Duration::hours(cfg.token_ttl_hours),
            otp_ttl: Duration::minutes(cfg.otp_ttl_minutes),
            allow_registration: cfg.allow_registration,
        }
    }
}

/// Admin auth service independent of the web framework
pub struct AuthService<R: AdminRepository + ?Sized = dyn AdminRepository> {
    repo: Arc<R>,
    mailer: Arc<dyn Mailer>,
    cfg: AuthConfig,
}

impl<R: AdminRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, mailer: Arc<dyn Mailer>, cfg: AuthConfig) -> Self {
        Self { repo, mailer, cfg }
    }

    /// Register a new admin with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::Duration;
    /// use service::auth::{AuthConfig, AuthService};
    /// use service::auth::domain::RegisterInput;
    /// use service::auth::repository::mock::MockAdminRepository;
    /// use service::mailer::mock::RecordingMailer;
    ///
    /// let cfg = AuthConfig { jwt_secret: "secret".into(), token_ttl: Duration::hours(8), otp_ttl: Duration::minutes(10), allow_registration: true };
    /// let svc = AuthService::new(Arc::new(MockAdminRepository::default()), Arc::new(RecordingMailer::default()), cfg);
    /// let input = RegisterInput { name: "Root".into(), email: "Root@Example.com".into(), password: "Secret123".into() };
    /// let admin = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(admin.email, "root@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AdminProfile, AuthError> {
        if !self.cfg.allow_registration {
            return Err(AuthError::RegistrationDisabled);
        }
        input.validate()?;
        let email = normalize_email(&input.email);
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            debug!("admin exists: {}", existing.email);
            return Err(AuthError::Conflict("email already in use".into()));
        }

        let hash = hash_password(&input.password)?;
        let admin = self.repo.create(input.name.trim(), &email, hash).await?;
        info!(admin_id = %admin.id, email = %admin.email, "admin_registered");
        Ok(admin.profile())
    }

    /// Check credentials and issue a bearer token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        input.validate()?;
        let admin = self.repo
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&input.password, &admin.password_hash)? {
            warn!(admin_id = %admin.id, "login rejected");
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&admin)?;
        info!(admin_id = %admin.id, "admin_logged_in");
        Ok(AuthSession { token, name: admin.name, email: admin.email })
    }

    /// Store a fresh one-time code and email it.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn forgot_password(&self, input: ForgotPasswordInput) -> Result<(), AuthError> {
        input.validate()?;
        let admin = self.repo
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(AuthError::NotFound)?;

        let code = generate_otp();
        let expires = Utc::now() + self.cfg.otp_ttl;
        self.repo
            .update(admin.id, AdminChanges {
                otp_code: Some(Some(code.clone())),
                otp_expires_at: Some(Some(expires)),
                reset_authorized_until: Some(None),
                ..Default::default()
            })
            .await?;

        self.mailer
            .send(templates::otp(&admin.email, &code, self.cfg.otp_ttl.num_minutes()))
            .await?;
        info!(admin_id = %admin.id, "otp_issued");
        Ok(())
    }

    /// Consume a valid code and open the password-reset window.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn verify_otp(&self, input: VerifyOtpInput) -> Result<(), AuthError> {
        input.validate()?;
        let admin = self.repo
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(AuthError::InvalidOtp)?;

        let now = Utc::now();
        let matches = admin.otp_code.as_deref() == Some(input.otp.trim());
        let live = admin.otp_expires_at.map(|t| t > now).unwrap_or(false);
        if !matches || !live {
            warn!(admin_id = %admin.id, expired = matches && !live, "otp rejected");
            return Err(AuthError::InvalidOtp);
        }

        self.repo
            .update(admin.id, AdminChanges {
                otp_code: Some(None),
                otp_expires_at: Some(None),
                reset_authorized_until: Some(Some(now + self.cfg.otp_ttl)),
                ..Default::default()
            })
            .await?;
        info!(admin_id = %admin.id, "otp_verified");
        Ok(())
    }

    /// Set a new password; only allowed inside the window opened by `verify_otp`.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn reset_password(&self, input: ResetPasswordInput) -> Result<(), AuthError> {
        input.validate()?;
        let admin = self.repo
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(AuthError::ResetNotAuthorized)?;

        let authorized = admin.reset_authorized_until.map(|t| t > Utc::now()).unwrap_or(false);
        if !authorized {
            return Err(AuthError::ResetNotAuthorized);
        }

        let hash = hash_password(&input.new_password)?;
        self.repo
            .update(admin.id, AdminChanges {
                password_hash: Some(hash),
                reset_authorized_until: Some(None),
                ..Default::default()
            })
            .await?;
        info!(admin_id = %admin.id, "password_reset");
        Ok(())
    }

    pub async fn profile(&self, admin_id: Uuid) -> Result<AdminProfile, AuthError> {
        let admin = self.repo.find_by_id(admin_id).await?.ok_or(AuthError::NotFound)?;
        Ok(admin.profile())
    }

    /// Apply the supplied profile fields only.
    #[instrument(skip(self, input))]
    pub async fn update_profile(&self, admin_id: Uuid, input: UpdateProfileInput) -> Result<AdminProfile, AuthError> {
        let input = input.normalized();
        input.validate()?;

        let password_hash = match &input.password {
            Some(p) => Some(hash_password(p)?),
            None => None,
        };
        let changes = AdminChanges {
            name: input.name,
            email: input.email.as_deref().map(normalize_email),
            password_hash,
            ..Default::default()
        };
        let admin = self.repo.update(admin_id, changes).await?;
        info!(admin_id = %admin.id, "admin_profile_updated");
        Ok(admin.profile())
    }

    pub fn issue_token(&self, admin: &AdminAccount) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: admin.id.to_string(),
            name: admin.name.clone(),
            iat: now.timestamp(),
            exp: (now + self.cfg.token_ttl).timestamp(),
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Decode and check a bearer token.
    pub fn verify_token(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<AdminClaims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::InvalidToken
            })
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Six decimal digits.
fn generate_otp() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAdminRepository;
    use crate::mailer::mock::{FailingMailer, RecordingMailer};

    fn cfg() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            token_ttl: Duration::hours(8),
            otp_ttl: Duration::minutes(10),
            allow_registration: true,
        }
    }

    fn service() -> (AuthService<MockAdminRepository>, Arc<MockAdminRepository>, Arc<RecordingMailer>) {
        let repo = Arc::new(MockAdminRepository::default());
        let mailer = Arc::new(RecordingMailer::default());
        (AuthService::new(repo.clone(), mailer.clone(), cfg()), repo, mailer)
    }

    async fn registered(svc: &AuthService<MockAdminRepository>) -> AdminProfile {
        svc.register(RegisterInput { name: "Root".into(), email: "root@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap()
    }

    fn otp_from(mailer: &RecordingMailer) -> String {
        let mail = mailer.last_to("root@example.com").unwrap();
        mail.html
            .split(|c: char| !c.is_ascii_digit())
            .find(|s| s.len() == 6)
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn register_and_login() {
        let (svc, _, _) = service();
        let admin = registered(&svc).await;

        let session = svc.login(LoginInput { email: "ROOT@example.com".into(), password: "Passw0rd!".into() }).await.unwrap();
        assert_eq!(session.email, "root@example.com");
        let claims = svc.verify_token(&session.token).unwrap();
        assert_eq!(claims.admin_id(), Some(admin.id));
        assert_eq!(claims.name, "Root");
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (svc, _, _) = service();
        registered(&svc).await;
        let again = svc
            .register(RegisterInput { name: "Other".into(), email: " Root@Example.com".into(), password: "Passw0rd!".into() })
            .await;
        assert!(matches!(again, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn registration_can_be_disabled() {
        let repo = Arc::new(MockAdminRepository::default());
        let svc = AuthService::new(repo, Arc::new(RecordingMailer::default()), AuthConfig { allow_registration: false, ..cfg() });
        let res = svc
            .register(RegisterInput { name: "Root".into(), email: "root@example.com".into(), password: "Passw0rd!".into() })
            .await;
        assert!(matches!(res, Err(AuthError::RegistrationDisabled)));
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let (svc, _, _) = service();
        registered(&svc).await;
        let wrong_pw = svc.login(LoginInput { email: "root@example.com".into(), password: "nope-nope".into() }).await;
        let unknown = svc.login(LoginInput { email: "ghost@example.com".into(), password: "Passw0rd!".into() }).await;
        assert_eq!(wrong_pw.unwrap_err().to_string(), unknown.unwrap_err().to_string());
    }

    #[tokio::test]
    async fn tokens_from_another_secret_are_rejected() {
        let (svc, repo, _) = service();
        let admin = registered(&svc).await;
        let account = repo.find_by_id(admin.id).await.unwrap().unwrap();

        let other = AuthService::new(repo.clone(), Arc::new(RecordingMailer::default()), AuthConfig { jwt_secret: "other".into(), ..cfg() });
        let foreign = other.issue_token(&account).unwrap();
        assert!(matches!(svc.verify_token(&foreign), Err(AuthError::InvalidToken)));
        assert!(matches!(svc.verify_token("garbage"), Err(AuthError::InvalidToken)));

        let expired = AuthService::new(repo, Arc::new(RecordingMailer::default()), AuthConfig { token_ttl: Duration::hours(-1), ..cfg() });
        let stale = expired.issue_token(&account).unwrap();
        assert!(matches!(svc.verify_token(&stale), Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn otp_reset_flow() {
        let (svc, _, mailer) = service();
        registered(&svc).await;

        svc.forgot_password(ForgotPasswordInput { email: "root@example.com".into() }).await.unwrap();
        let code = otp_from(&mailer);

        // no reset before verification
        let early = svc.reset_password(ResetPasswordInput { email: "root@example.com".into(), new_password: "NewPassw0rd".into() }).await;
        assert!(matches!(early, Err(AuthError::ResetNotAuthorized)));

        let wrong = if code == "000000" { "111111" } else { "000000" };
        assert!(matches!(
            svc.verify_otp(VerifyOtpInput { email: "root@example.com".into(), otp: wrong.into() }).await,
            Err(AuthError::InvalidOtp)
        ));
        svc.verify_otp(VerifyOtpInput { email: "root@example.com".into(), otp: code.clone() }).await.unwrap();
        // single use
        assert!(matches!(
            svc.verify_otp(VerifyOtpInput { email: "root@example.com".into(), otp: code }).await,
            Err(AuthError::InvalidOtp)
        ));

        svc.reset_password(ResetPasswordInput { email: "root@example.com".into(), new_password: "NewPassw0rd".into() }).await.unwrap();
        assert!(svc.login(LoginInput { email: "root@example.com".into(), password: "NewPassw0rd".into() }).await.is_ok());
        assert!(svc.login(LoginInput { email: "root@example.com".into(), password: "Passw0rd!".into() }).await.is_err());

        // the window closes after one reset
        let again = svc.reset_password(ResetPasswordInput { email: "root@example.com".into(), new_password: "Another123".into() }).await;
        assert!(matches!(again, Err(AuthError::ResetNotAuthorized)));
    }

    #[tokio::test]
    async fn expired_otp_is_rejected() {
        let (svc, repo, _) = service();
        let admin = registered(&svc).await;
        repo.update(admin.id, AdminChanges {
            otp_code: Some(Some("123456".into())),
            otp_expires_at: Some(Some(Utc::now() - Duration::minutes(1))),
            ..Default::default()
        })
        .await
        .unwrap();
        let res = svc.verify_otp(VerifyOtpInput { email: "root@example.com".into(), otp: "123456".into() }).await;
        assert!(matches!(res, Err(AuthError::InvalidOtp)));
    }

    #[tokio::test]
    async fn forgot_password_unknown_email_and_mail_failure() {
        let (svc, _, _) = service();
        assert!(matches!(
            svc.forgot_password(ForgotPasswordInput { email: "ghost@example.com".into() }).await,
            Err(AuthError::NotFound)
        ));

        let repo = Arc::new(MockAdminRepository::default());
        let failing = AuthService::new(repo, Arc::new(FailingMailer), cfg());
        registered(&failing).await;
        let res = failing.forgot_password(ForgotPasswordInput { email: "root@example.com".into() }).await;
        assert!(matches!(res, Err(AuthError::Mail(_))));
    }

    #[tokio::test]
    async fn profile_update_is_partial() {
        let (svc, _, _) = service();
        let admin = registered(&svc).await;

        let updated = svc
            .update_profile(admin.id, UpdateProfileInput { name: Some("Boss".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "Boss");
        assert_eq!(updated.email, "root@example.com");

        let none = svc.update_profile(admin.id, UpdateProfileInput::default()).await;
        assert!(matches!(none, Err(AuthError::Validation(_))));

        svc.update_profile(admin.id, UpdateProfileInput { password: Some("Changed123".into()), ..Default::default() })
            .await
            .unwrap();
        assert!(svc.login(LoginInput { email: "root@example.com".into(), password: "Changed123".into() }).await.is_ok());

        svc.register(RegisterInput { name: "Two".into(), email: "two@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();
        let clash = svc
            .update_profile(admin.id, UpdateProfileInput { email: Some("two@example.com".into()), ..Default::default() })
            .await;
        assert!(matches!(clash, Err(AuthError::Conflict(_))));

        assert!(matches!(svc.profile(Uuid::new_v4()).await, Err(AuthError::NotFound)));
    }
}
