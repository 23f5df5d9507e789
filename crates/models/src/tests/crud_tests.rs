use crate::{admin, avis, client, slug};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use anyhow::Result;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::test_db;

fn new_client(name: &str) -> client::ActiveModel {
    let slug = format!("{}-{}", slug::slugify(name), Uuid::new_v4().simple());
    let now = Utc::now().into();
    client::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("{name} {}", Uuid::new_v4())),
        public_url: Set(client::default_public_url("http://localhost:3000", &slug)),
        slug: Set(slug),
        language: Set("fr".into()),
        business_status: Set(None),
        place_id: Set(None),
        status: Set(client::DEFAULT_STATUS.into()),
        contact_name: Set(None),
        contact_email: Set(None),
        contact_phone: Set(None),
        admin_notes: Set(None),
        logo: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn test_admin_create_and_lookup() -> Result<()> {
    let Some(db) = test_db().await? else { return Ok(()) };

    let email = format!("Admin_{}@Example.com", Uuid::new_v4());
    let created = admin::create(&db, "Root", &email, "$argon2id$v=19$stub".into()).await?;
    assert_eq!(created.email, admin::normalize_email(&email));

    let found = admin::find_by_email(&db, &email.to_uppercase()).await?;
    assert_eq!(found.map(|a| a.id), Some(created.id));

    // unique email
    assert!(admin::create(&db, "Other", &email, "$argon2id$v=19$stub".into()).await.is_err());

    admin::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_reviews_cascade_with_client() -> Result<()> {
    let Some(db) = test_db().await? else { return Ok(()) };

    let c = new_client("Cascade Bistro").insert(&db).await?;
    let now = Utc::now();
    for (i, rating) in [5i16, 2, 4].into_iter().enumerate() {
        avis::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(c.id),
            rating: Set(rating),
            comment: Set(Some(format!("review {i}"))),
            contact: Set(None),
            submitted_at: Set((now - Duration::minutes(i as i64)).into()),
        }
        .insert(&db)
        .await?;
    }

    let listed = avis::Entity::find()
        .filter(avis::Column::ClientId.eq(c.id))
        .order_by_desc(avis::Column::SubmittedAt)
        .all(&db)
        .await?;
    assert_eq!(listed.iter().map(|a| a.rating).collect::<Vec<_>>(), vec![5, 2, 4]);

    let with_client = avis::Entity::find()
        .filter(avis::Column::ClientId.eq(c.id))
        .find_also_related(client::Entity)
        .all(&db)
        .await?;
    assert!(with_client.iter().all(|(_, cl)| cl.as_ref().map(|cl| cl.id) == Some(c.id)));

    client::Entity::delete_by_id(c.id).exec(&db).await?;
    let orphans = avis::Entity::find().filter(avis::Column::ClientId.eq(c.id)).all(&db).await?;
    assert!(orphans.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_rating_check_constraint() -> Result<()> {
    let Some(db) = test_db().await? else { return Ok(()) };

    let c = new_client("Constraint Cafe").insert(&db).await?;
    let bad = avis::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(c.id),
        rating: Set(9),
        comment: Set(None),
        contact: Set(None),
        submitted_at: Set(Utc::now().into()),
    };
    assert!(bad.insert(&db).await.is_err());

    client::Entity::delete_by_id(c.id).exec(&db).await?;
    Ok(())
}
