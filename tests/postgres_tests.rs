//! Runs against a real Postgres. Set DATABASE_URL and use `--ignored`.

mod common;

use std::sync::Arc;

use design_forge::{
    auth::{
        error::AccountError,
        password::CredentialHasher,
        repo::{AccountStore, PgAccountStore},
        services::CredentialManager,
        suspension::SuspensionCoordinator,
    },
    store::StoreError,
};
use sqlx::PgPool;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.expect("connect");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrate");
    pool
}

async fn active_rows(db: &PgPool, user_id: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await
        .unwrap();
    count
}

fn unique_email(tag: &str) -> String {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    format!("{tag}-{nanos}@forge.io")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unique_email_maps_to_unique_violation() {
    let store = PgAccountStore::new(pool().await);
    let email = unique_email("dup");
    let user = design_forge::auth::repo_types::NewUser {
        email: &email,
        password: "$argon2id$stub",
        name: "Ana",
        role: "client",
    };
    store.insert_user(&user).await.unwrap();
    let err = store.insert_user(&user).await.unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(_)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn suspension_commits_both_tables() {
    let db = pool().await;
    let store: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(db.clone()));
    let credentials = CredentialManager::new(
        store.clone(),
        CredentialHasher::new(&common::test_hashing()).unwrap(),
    );
    let suspensions = SuspensionCoordinator::new(store.clone());

    let email = unique_email("suspend");
    let user = credentials
        .register(common::registration(&email, "pass"))
        .await
        .unwrap();

    let snapshot = suspensions.suspend(user.id).await.unwrap();
    assert_eq!(snapshot.user_id, user.id);
    assert_eq!(active_rows(&db, user.id).await, 0);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM suspended_users WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&db)
            .await
            .unwrap();
    assert_eq!(count, 1);

    let err = suspensions.suspend(user.id).await.unwrap_err();
    assert!(matches!(err, AccountError::NotFound));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn uncommitted_copy_is_rolled_back() {
    let db = pool().await;
    let store = PgAccountStore::new(db.clone());
    let email = unique_email("rollback");
    let user = store
        .insert_user(&design_forge::auth::repo_types::NewUser {
            email: &email,
            password: "$argon2id$stub",
            name: "Ana",
            role: "client",
        })
        .await
        .unwrap();

    let mut tx = store.begin_suspension().await.unwrap();
    assert!(tx.copy_to_suspended(user.id).await.unwrap().is_some());
    tx.rollback().await.unwrap();

    assert_eq!(active_rows(&db, user.id).await, 1);
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM suspended_users WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&db)
            .await
            .unwrap();
    assert_eq!(count, 0);
}
