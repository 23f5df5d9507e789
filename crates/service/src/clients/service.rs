use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::{client, slug};

use super::domain::{Client, ClientChanges, ClientDraft, ClientPatch, ClientSaved, NewClient, PublicClient};
use super::repository::{ClientRepository, NAME_TAKEN};
use crate::errors::ServiceError;
use crate::mailer::{templates, Mailer, OutgoingEmail};
use crate::storage::{LogoStore, LogoUpload};
use crate::validation::Validate;

/// Upper bound on suffix probes for one slug.
const MAX_SLUG_PROBES: u32 = 10_000;

pub struct ClientService<R: ClientRepository + ?Sized = dyn ClientRepository> {
    repo: Arc<R>,
    logos: LogoStore,
    mailer: Arc<dyn Mailer>,
    public_base_url: String,
}

impl<R: ClientRepository + ?Sized> ClientService<R> {
    pub fn new(repo: Arc<R>, logos: LogoStore, mailer: Arc<dyn Mailer>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self { repo, logos, mailer, public_base_url }
    }

    pub fn logos(&self) -> &LogoStore {
        &self.logos
    }

    pub async fn list(&self) -> Result<Vec<Client>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Client, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("client"))
    }

    /// Public view of the client owning `slug`.
    pub async fn public_profile(&self, slug: &str) -> Result<PublicClient, ServiceError> {
        let client = self.repo.find_by_slug(slug).await?.ok_or_else(|| ServiceError::not_found("client"))?;
        Ok(client.into())
    }

    /// First free slug derived from `name`, ignoring the one held by `except`.
    pub async fn unique_slug(&self, name: &str, except: Option<Uuid>) -> Result<String, ServiceError> {
        let base = slug::slugify(name);
        for n in 0..MAX_SLUG_PROBES {
            let candidate = slug::candidate(&base, n);
            if !self.repo.slug_taken(&candidate, except).await? {
                return Ok(candidate);
            }
        }
        Err(ServiceError::Conflict(format!("no free slug for {base}")))
    }

    #[instrument(skip(self, draft, logo), fields(name = ?draft.0.name))]
    pub async fn create(&self, draft: ClientDraft, logo: Option<LogoUpload>) -> Result<ClientSaved, ServiceError> {
        let draft = ClientDraft(draft.0.normalized());
        draft.validate()?;
        let input = draft.0;
        let (Some(name), Some(language)) = (input.name, input.language) else {
            return Err(ServiceError::Validation("name and language are required".into()));
        };

        if self.repo.name_taken(&name, None).await? {
            return Err(ServiceError::Conflict(NAME_TAKEN.into()));
        }
        if let Some(upload) = &logo {
            LogoStore::extension_of(&upload.file_name)?;
        }
        let slug = self.unique_slug(&name, None).await?;

        let stored_logo = match &logo {
            Some(upload) => Some(self.logos.save(upload).await?),
            None => None,
        };
        let new_client = NewClient {
            public_url: input.public_url.unwrap_or_else(|| client::default_public_url(&self.public_base_url, &slug)),
            status: input.status.unwrap_or_else(|| client::DEFAULT_STATUS.to_string()),
            name,
            slug,
            language,
            business_status: input.business_status,
            place_id: input.place_id,
            contact_name: input.contact_name,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            admin_notes: input.admin_notes,
            logo: stored_logo.clone(),
        };

        let created = match self.repo.insert(new_client).await {
            Ok(c) => c,
            Err(e) => {
                self.discard_logo(stored_logo.as_deref()).await;
                return Err(e);
            }
        };
        info!(client_id = %created.id, slug = %created.slug, "client_created");

        if let Some(to) = created.contact_email.as_deref() {
            let reviews_url = client::reviews_url(&self.public_base_url, &created.slug);
            let email = templates::client_welcome(to, created.greeting_name(), &created.public_url, &reviews_url);
            self.notify(created.id, email).await;
        }

        Ok(ClientSaved { message: "client created".into(), slug: created.slug.clone(), client: created })
    }

    #[instrument(skip(self, patch, logo))]
    pub async fn update(&self, id: Uuid, patch: ClientPatch, logo: Option<LogoUpload>) -> Result<ClientSaved, ServiceError> {
        let patch = ClientPatch(patch.0.normalized());
        patch.validate()?;
        let input = patch.0;
        let current = self.get(id).await?;

        if let Some(upload) = &logo {
            LogoStore::extension_of(&upload.file_name)?;
        }

        let mut changes = ClientChanges {
            language: input.language,
            business_status: input.business_status,
            place_id: input.place_id,
            public_url: input.public_url,
            status: input.status,
            contact_name: input.contact_name,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            admin_notes: input.admin_notes,
            ..Default::default()
        };

        if let Some(name) = input.name.filter(|n| *n != current.name) {
            if self.repo.name_taken(&name, Some(id)).await? {
                return Err(ServiceError::Conflict(NAME_TAKEN.into()));
            }
            let new_slug = self.unique_slug(&name, Some(id)).await?;
            if new_slug != current.slug {
                let followed_default = current.public_url == client::default_public_url(&self.public_base_url, &current.slug);
                if followed_default && changes.public_url.is_none() {
                    changes.public_url = Some(client::default_public_url(&self.public_base_url, &new_slug));
                }
                changes.slug = Some(new_slug);
            }
            changes.name = Some(name);
        }

        let stored_logo = match &logo {
            Some(upload) => Some(self.logos.save(upload).await?),
            None => None,
        };
        changes.logo = stored_logo.clone();

        let updated = match self.repo.update(id, changes).await {
            Ok(c) => c,
            Err(e) => {
                self.discard_logo(stored_logo.as_deref()).await;
                return Err(e);
            }
        };
        if stored_logo.is_some() {
            self.discard_logo(current.logo.as_deref()).await;
        }
        info!(client_id = %updated.id, slug = %updated.slug, "client_updated");

        if let Some(to) = updated.contact_email.as_deref() {
            let renamed = updated.name != current.name;
            let reviews_url = client::reviews_url(&self.public_base_url, &updated.slug);
            let email = templates::client_updated(to, updated.greeting_name(), &updated.public_url, &reviews_url, renamed);
            self.notify(updated.id, email).await;
        }

        Ok(ClientSaved { message: "client updated".into(), slug: updated.slug.clone(), client: updated })
    }

    /// Delete the client, its reviews and its logo file.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let removed = self.repo.delete(id).await?.ok_or_else(|| ServiceError::not_found("client"))?;
        self.discard_logo(removed.logo.as_deref()).await;
        info!(client_id = %id, "client_deleted");
        Ok(())
    }

    /// Best-effort logo removal; the row change already happened.
    async fn discard_logo(&self, name: Option<&str>) {
        let Some(name) = name else { return };
        if let Err(e) = self.logos.remove(name).await {
            warn!(file = %name, error = %e, "logo cleanup failed");
        }
    }

    /// Client notifications never fail the request.
    async fn notify(&self, client_id: Uuid, email: OutgoingEmail) {
        if let Err(e) = self.mailer.send(email).await {
            warn!(client_id = %client_id, error = %e, "client notification not delivered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::domain::ClientInput;
    use crate::mailer::mock::{FailingMailer, RecordingMailer};
    use crate::memory::InMemoryStore;
    use crate::test_support::temp_logo_store;

    const BASE: &str = "http://localhost:3000";

    async fn service_with(mailer: Arc<dyn Mailer>) -> (ClientService<InMemoryStore>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        let logos = temp_logo_store().await;
        (ClientService::new(store.clone(), logos, mailer, BASE), store)
    }

    fn draft(name: &str) -> ClientDraft {
        ClientDraft(ClientInput { name: Some(name.into()), language: Some("fr".into()), ..Default::default() })
    }

    #[tokio::test]
    async fn create_fills_defaults() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        let saved = svc.create(draft("  Café de la Gare "), None).await.unwrap();
        assert_eq!(saved.slug, "cafe-de-la-gare");
        assert_eq!(saved.client.name, "Café de la Gare");
        assert_eq!(saved.client.public_url, "http://localhost:3000/public/cafe-de-la-gare");
        assert_eq!(saved.client.status, "active");
        assert!(saved.client.logo.is_none());
    }

    #[tokio::test]
    async fn slugs_get_numbered_suffixes() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        assert_eq!(svc.create(draft("Acme"), None).await.unwrap().slug, "acme");
        assert_eq!(svc.create(draft("ACME!"), None).await.unwrap().slug, "acme-1");
        assert_eq!(svc.create(draft("acme?"), None).await.unwrap().slug, "acme-2");
        assert_eq!(svc.unique_slug("Acme", None).await.unwrap(), "acme-3");
    }

    #[tokio::test]
    async fn duplicate_names_conflict() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        svc.create(draft("Acme"), None).await.unwrap();
        assert!(matches!(svc.create(draft("Acme"), None).await, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn missing_required_fields() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        let res = svc.create(ClientDraft(ClientInput { name: Some("Acme".into()), ..Default::default() }), None).await;
        match res {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, "name and language are required"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn welcome_email_and_swallowed_failures() {
        let mailer = Arc::new(RecordingMailer::default());
        let (svc, _) = service_with(mailer.clone()).await;
        let mut d = draft("Acme");
        d.0.contact_email = Some("owner@acme.test".into());
        d.0.contact_name = Some("Ann".into());
        svc.create(d, None).await.unwrap();
        let mail = mailer.last_to("owner@acme.test").unwrap();
        assert!(mail.html.contains("Ann"));
        assert!(mail.html.contains("http://localhost:3000/public/acme/avis"));

        let (failing, _) = service_with(Arc::new(FailingMailer)).await;
        let mut d = draft("Acme");
        d.0.contact_email = Some("owner@acme.test".into());
        assert!(failing.create(d, None).await.is_ok());
    }

    #[tokio::test]
    async fn rename_moves_slug_and_default_url() {
        let mailer = Arc::new(RecordingMailer::default());
        let (svc, _) = service_with(mailer.clone()).await;
        let mut d = draft("Acme");
        d.0.contact_email = Some("owner@acme.test".into());
        let created = svc.create(d, None).await.unwrap().client;

        // keeping the same name keeps the slug
        let same = svc
            .update(created.id, ClientPatch(ClientInput { name: Some("Acme".into()), ..Default::default() }), None)
            .await
            .unwrap();
        assert_eq!(same.slug, "acme");
        assert!(!mailer.last_to("owner@acme.test").unwrap().html.contains("name changed"));

        let renamed = svc
            .update(created.id, ClientPatch(ClientInput { name: Some("Acme Bakery".into()), ..Default::default() }), None)
            .await
            .unwrap();
        assert_eq!(renamed.slug, "acme-bakery");
        assert_eq!(renamed.client.public_url, "http://localhost:3000/public/acme-bakery");
        assert_eq!(renamed.client.language, "fr");
        let mail = mailer.last_to("owner@acme.test").unwrap();
        assert!(mail.html.contains("name changed"));
        assert!(mail.html.contains("http://localhost:3000/public/acme-bakery/avis"));
    }

    #[tokio::test]
    async fn long_names_get_slugs_that_fit_the_column() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        let name = "ß".repeat(200);
        let first = svc.create(draft(&name), None).await.unwrap();
        assert!(first.slug.len() <= 255);

        // same slug base, different name: the suffixed probe must fit too
        let second = svc.create(draft(&format!("{name}!")), None).await.unwrap();
        assert_eq!(second.slug, format!("{}-1", first.slug));
        assert!(second.slug.len() <= 255);
    }

    #[tokio::test]
    async fn oversized_public_url_is_rejected() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        let mut d = draft("Acme");
        d.0.public_url = Some(format!("https://acme.test/{}", "x".repeat(600)));
        assert!(matches!(svc.create(d, None).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn custom_public_url_survives_rename() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        let mut d = draft("Acme");
        d.0.public_url = Some("https://acme.test/reviews".into());
        let created = svc.create(d, None).await.unwrap().client;
        let renamed = svc
            .update(created.id, ClientPatch(ClientInput { name: Some("Acme Two".into()), ..Default::default() }), None)
            .await
            .unwrap();
        assert_eq!(renamed.client.public_url, "https://acme.test/reviews");
    }

    #[tokio::test]
    async fn update_blank_fields_are_ignored_and_conflicts_detected() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        let a = svc.create(draft("Alpha"), None).await.unwrap().client;
        svc.create(draft("Beta"), None).await.unwrap();

        let kept = svc
            .update(a.id, ClientPatch(ClientInput { language: Some("  ".into()), admin_notes: Some("vip".into()), ..Default::default() }), None)
            .await
            .unwrap();
        assert_eq!(kept.client.language, "fr");
        assert_eq!(kept.client.admin_notes.as_deref(), Some("vip"));

        let clash = svc.update(a.id, ClientPatch(ClientInput { name: Some("Beta".into()), ..Default::default() }), None).await;
        assert!(matches!(clash, Err(ServiceError::Conflict(_))));
        let missing = svc.update(Uuid::new_v4(), ClientPatch::default(), None).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn logo_lifecycle() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        let created = svc.create(draft("Acme"), Some(LogoUpload::new("logo.png", vec![1, 2, 3]))).await.unwrap().client;
        let first = created.logo.clone().unwrap();
        assert!(svc.logos().exists(&first).await);

        let updated = svc
            .update(created.id, ClientPatch::default(), Some(LogoUpload::new("new.svg", b"<svg/>".to_vec())))
            .await
            .unwrap()
            .client;
        let second = updated.logo.clone().unwrap();
        assert!(second.ends_with("-logo.svg"));
        assert!(!svc.logos().exists(&first).await);
        assert!(svc.logos().exists(&second).await);

        svc.delete(created.id).await.unwrap();
        assert!(!svc.logos().exists(&second).await);
        assert!(matches!(svc.get(created.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(created.id).await, Err(ServiceError::NotFound(_))));

        let _ = tokio::fs::remove_dir_all(svc.logos().dir()).await;
    }

    #[tokio::test]
    async fn bad_logo_type_creates_nothing() {
        let (svc, store) = service_with(Arc::new(RecordingMailer::default())).await;
        let res = svc.create(draft("Acme"), Some(LogoUpload::new("logo.exe", vec![1]))).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn public_profile_hides_private_fields() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        let mut d = draft("Acme");
        d.0.admin_notes = Some("late payer".into());
        d.0.contact_phone = Some("0102030405".into());
        svc.create(d, None).await.unwrap();

        let public = svc.public_profile("acme").await.unwrap();
        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(json["name"], "Acme");
        assert!(json.get("admin_notes").is_none());
        assert!(json.get("contact_phone").is_none());
        assert!(matches!(svc.public_profile("nope").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (svc, _) = service_with(Arc::new(RecordingMailer::default())).await;
        svc.create(draft("First"), None).await.unwrap();
        svc.create(draft("Second"), None).await.unwrap();
        let names: Vec<_> = svc.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }
}
