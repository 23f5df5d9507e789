//! In-memory storage backing the client, review and dashboard repositories.
//!
//! Used by tests and local demos; mirrors the relational constraints that
//! matter to the services (unique name and slug, cascading review deletes,
//! newest-first ordering).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clients::domain::{Client, ClientChanges, NewClient};
use crate::clients::repository::{ClientRepository, NAME_TAKEN};
use crate::dashboard::repository::{ClientAverage, DashboardRepository, Totals};
use crate::errors::ServiceError;
use crate::reviews::domain::{Review, ReviewRecord, ReviewWithClient};
use crate::reviews::repository::ReviewRepository;

#[derive(Default)]
struct Tables {
    /// Insertion sequence breaks timestamp ties.
    seq: u64,
    clients: HashMap<Uuid, (u64, Client)>,
    reviews: HashMap<Uuid, (u64, Review)>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn clients_newest_first(&self) -> Vec<Client> {
        let mut rows: Vec<_> = self.clients.values().collect();
        rows.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
        rows.into_iter().map(|(_, c)| c.clone()).collect()
    }

    fn reviews_newest_first(&self) -> Vec<Review> {
        let mut rows: Vec<_> = self.reviews.values().collect();
        rows.sort_by(|a, b| (b.1.submitted_at, b.0).cmp(&(a.1.submitted_at, a.0)));
        rows.into_iter().map(|(_, r)| r.clone()).collect()
    }

    fn with_client_name(&self, review: Review) -> ReviewWithClient {
        let client_name = self.clients.get(&review.client_id).map(|(_, c)| c.name.clone()).unwrap_or_default();
        ReviewWithClient { review, client_name }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, ServiceError> {
        self.tables.lock().map_err(|e| ServiceError::Db(e.to_string()))
    }

    /// Insert a minimal client directly. Returns its id.
    pub fn seed_client(&self, name: &str, slug: &str) -> Uuid {
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            language: "fr".into(),
            business_status: None,
            place_id: None,
            public_url: format!("http://localhost:3000/public/{slug}"),
            status: models::client::DEFAULT_STATUS.into(),
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            admin_notes: None,
            logo: None,
            created_at: now,
            updated_at: now,
        };
        let id = client.id;
        if let Ok(mut t) = self.tables.lock() {
            let seq = t.next_seq();
            t.clients.insert(id, (seq, client));
        }
        id
    }

    /// Backdate a review, e.g. to push it out of the dashboard window.
    pub fn set_submitted_at(&self, review_id: Uuid, at: DateTime<Utc>) -> bool {
        match self.tables.lock() {
            Ok(mut t) => match t.reviews.get_mut(&review_id) {
                Some((_, r)) => {
                    r.submitted_at = at;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ClientRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Client>, ServiceError> {
        Ok(self.tables()?.clients_newest_first())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError> {
        Ok(self.tables()?.clients.get(&id).map(|(_, c)| c.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Client>, ServiceError> {
        Ok(self.tables()?.clients.values().find(|(_, c)| c.slug == slug).map(|(_, c)| c.clone()))
    }

    async fn name_taken(&self, name: &str, except: Option<Uuid>) -> Result<bool, ServiceError> {
        Ok(self.tables()?.clients.values().any(|(_, c)| c.name == name && Some(c.id) != except))
    }

    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, ServiceError> {
        Ok(self.tables()?.clients.values().any(|(_, c)| c.slug == slug && Some(c.id) != except))
    }

    async fn insert(&self, n: NewClient) -> Result<Client, ServiceError> {
        let mut t = self.tables()?;
        if t.clients.values().any(|(_, c)| c.name == n.name) {
            return Err(ServiceError::Conflict(NAME_TAKEN.into()));
        }
        if t.clients.values().any(|(_, c)| c.slug == n.slug) {
            return Err(ServiceError::Conflict("slug already in use".into()));
        }
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            name: n.name,
            slug: n.slug,
            language: n.language,
            business_status: n.business_status,
            place_id: n.place_id,
            public_url: n.public_url,
            status: n.status,
            contact_name: n.contact_name,
            contact_email: n.contact_email,
            contact_phone: n.contact_phone,
            admin_notes: n.admin_notes,
            logo: n.logo,
            created_at: now,
            updated_at: now,
        };
        let seq = t.next_seq();
        t.clients.insert(client.id, (seq, client.clone()));
        Ok(client)
    }

    async fn update(&self, id: Uuid, ch: ClientChanges) -> Result<Client, ServiceError> {
        let mut t = self.tables()?;
        if let Some(name) = &ch.name {
            if t.clients.values().any(|(_, c)| &c.name == name && c.id != id) {
                return Err(ServiceError::Conflict(NAME_TAKEN.into()));
            }
        }
        if let Some(slug) = &ch.slug {
            if t.clients.values().any(|(_, c)| &c.slug == slug && c.id != id) {
                return Err(ServiceError::Conflict("slug already in use".into()));
            }
        }
        let (_, c) = t.clients.get_mut(&id).ok_or_else(|| ServiceError::not_found("client"))?;
        if let Some(v) = ch.name { c.name = v; }
        if let Some(v) = ch.slug { c.slug = v; }
        if let Some(v) = ch.language { c.language = v; }
        if let Some(v) = ch.business_status { c.business_status = Some(v); }
        if let Some(v) = ch.place_id { c.place_id = Some(v); }
        if let Some(v) = ch.public_url { c.public_url = v; }
        if let Some(v) = ch.status { c.status = v; }
        if let Some(v) = ch.contact_name { c.contact_name = Some(v); }
        if let Some(v) = ch.contact_email { c.contact_email = Some(v); }
        if let Some(v) = ch.contact_phone { c.contact_phone = Some(v); }
        if let Some(v) = ch.admin_notes { c.admin_notes = Some(v); }
        if let Some(v) = ch.logo { c.logo = Some(v); }
        c.updated_at = Utc::now();
        Ok(c.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Client>, ServiceError> {
        let mut t = self.tables()?;
        let removed = t.clients.remove(&id).map(|(_, c)| c);
        if removed.is_some() {
            t.reviews.retain(|_, (_, r)| r.client_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn client_id_for_slug(&self, slug: &str) -> Result<Option<Uuid>, ServiceError> {
        Ok(self.tables()?.clients.values().find(|(_, c)| c.slug == slug).map(|(_, c)| c.id))
    }

    async fn insert(&self, r: ReviewRecord) -> Result<Review, ServiceError> {
        let mut t = self.tables()?;
        if !t.clients.contains_key(&r.client_id) {
            return Err(ServiceError::not_found("client"));
        }
        let review = Review {
            id: Uuid::new_v4(),
            client_id: r.client_id,
            rating: r.rating,
            comment: r.comment,
            contact: r.contact,
            submitted_at: Utc::now(),
        };
        let seq = t.next_seq();
        t.reviews.insert(review.id, (seq, review.clone()));
        Ok(review)
    }

    async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Review>, ServiceError> {
        Ok(self.tables()?.reviews_newest_first().into_iter().filter(|r| r.client_id == client_id).collect())
    }

    async fn list_all(&self) -> Result<Vec<ReviewWithClient>, ServiceError> {
        let t = self.tables()?;
        Ok(t.reviews_newest_first().into_iter().map(|r| t.with_client_name(r)).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.tables()?.reviews.remove(&id).is_some())
    }
}

#[async_trait]
impl DashboardRepository for InMemoryStore {
    async fn totals(&self) -> Result<Totals, ServiceError> {
        let t = self.tables()?;
        let total_reviews = t.reviews.len() as i64;
        let average_rating = if total_reviews == 0 {
            None
        } else {
            Some(t.reviews.values().map(|(_, r)| f64::from(r.rating)).sum::<f64>() / total_reviews as f64)
        };
        Ok(Totals { total_clients: t.clients.len() as i64, total_reviews, average_rating })
    }

    async fn reviews_since(&self, since: DateTime<Utc>) -> Result<Vec<ReviewWithClient>, ServiceError> {
        let t = self.tables()?;
        Ok(t.reviews_newest_first()
            .into_iter()
            .filter(|r| r.submitted_at >= since)
            .map(|r| t.with_client_name(r))
            .collect())
    }

    async fn clients_with_average_at_least(&self, min_average: f64) -> Result<Vec<ClientAverage>, ServiceError> {
        let t = self.tables()?;
        let mut sums: HashMap<Uuid, (f64, i64)> = HashMap::new();
        for (_, r) in t.reviews.values() {
            let e = sums.entry(r.client_id).or_insert((0.0, 0));
            e.0 += f64::from(r.rating);
            e.1 += 1;
        }
        let mut out: Vec<ClientAverage> = sums
            .into_iter()
            .filter_map(|(id, (sum, n))| {
                let (_, c) = t.clients.get(&id)?;
                let average = sum / n as f64;
                (average >= min_average).then(|| ClientAverage {
                    id,
                    name: c.name.clone(),
                    logo: c.logo.clone(),
                    average,
                    review_count: n,
                })
            })
            .collect();
        out.sort_by(|a, b| b.average.total_cmp(&a.average).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }
}
