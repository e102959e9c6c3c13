use crate::db::connect;
use crate::{business_profile, user, user_credentials};
use crate::business_profile::{FinancialStats, NewBusinessProfile, RevenueEntry, RevenueSeries, SearchFilter};
use crate::errors::ModelError;
use crate::user::Role;
use sea_orm::{DatabaseConnection, EntityTrait};
use anyhow::Result;
use migration::MigratorTrait;
use uuid::Uuid;

/// Setup test database with migrations; `None` when no database is configured
async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip model db tests");
        return Ok(None);
    }
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4())
}

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let email = unique_email("model_user");
    let created = user::create(&db, "Model User", &email, Role::Business).await?;
    assert_eq!(created.email, email);
    assert_eq!(created.role, Role::Business);

    let found = user::find_by_email(&db, &email).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    // Duplicate email is a conflict, not a generic failure
    let dup = user::create(&db, "Other", &email, Role::General).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));

    let cred = user_credentials::upsert_password(&db, created.id, "hash-1".into(), "argon2").await?;
    let rehashed = user_credentials::upsert_password(&db, created.id, "hash-2".into(), "argon2").await?;
    assert_eq!(cred.id, rehashed.id);
    assert_eq!(rehashed.password_hash, "hash-2");

    user::hard_delete(&db, created.id).await?;
    assert!(user::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_business_profile_crud_and_unique_owner() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let owner = user::create(&db, "Profile Owner", &unique_email("model_bp"), Role::Business).await?;
    let new = NewBusinessProfile {
        user_id: owner.id,
        incorporation_type: "LLC".into(),
        business_name: format!("Acme {}", Uuid::new_v4()),
        ..Default::default()
    };
    let created = business_profile::create(&db, new.clone()).await?;
    assert_eq!(created.user_id, owner.id);
    assert!(created.financial_stats.is_none());

    // Second row for the same owner violates the unique key
    let second = business_profile::create(&db, new).await;
    assert!(matches!(second, Err(ModelError::Conflict(_))));
    assert_eq!(business_profile::count_by_user(&db, owner.id).await?, 1);

    let mut m = created.clone();
    m.financial_stats = Some(FinancialStats {
        revenue: Some(RevenueSeries(vec![RevenueEntry { year: Some(2024), amount: Some(10.0) }])),
        ..Default::default()
    });
    let saved = business_profile::save(&db, m).await?;
    assert_eq!(saved.financial_stats.and_then(|f| f.revenue).and_then(|r| r.latest_amount()), Some(10.0));

    let joined = business_profile::find_by_user_with_owner(&db, owner.id).await?;
    let (_, joined_owner) = joined.expect("profile with owner");
    assert_eq!(joined_owner.map(|u| u.name), Some("Profile Owner".to_string()));

    let hits = business_profile::search(&db, &SearchFilter { name: Some("acme".into()), incorporation_type: Some("LLC".into()) }).await?;
    assert!(hits.iter().any(|(p, _)| p.id == created.id));

    // Needle and column are folded by the same lower(), whatever case the caller sends
    for needle in ["ACME", "aCmE"] {
        let hits = business_profile::search(&db, &SearchFilter { name: Some(needle.into()), incorporation_type: None }).await?;
        assert!(hits.iter().any(|(p, _)| p.id == created.id), "needle {}", needle);
    }
    let literal = business_profile::search(&db, &SearchFilter { name: Some("ac%me".into()), incorporation_type: None }).await?;
    assert!(!literal.iter().any(|(p, _)| p.id == created.id));

    // Cascade removes the profile with its owner
    user::hard_delete(&db, owner.id).await?;
    assert!(business_profile::find_by_user(&db, owner.id).await?.is_none());
    Ok(())
}
