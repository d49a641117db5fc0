//! PostgreSQL repository tests. Run with `cargo test --features postgres-tests`
//! and `DATABASE_URL` pointing at a disposable server.
#![cfg(feature = "postgres-tests")]

use std::sync::Arc;

use sqlx::PgPool;
use url_mapper::domain::entities::NewMapping;
use url_mapper::domain::repositories::{MappingRepository, StoreError};
use url_mapper::infrastructure::persistence::PgMappingRepository;

#[sqlx::test]
async fn test_insert_mapping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    let mapping = repo
        .insert(NewMapping::new("test123", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(mapping.code, "test123");
    assert_eq!(mapping.target, "https://example.com");
    assert_eq!(mapping.visit_count, 0);
}

#[sqlx::test]
async fn test_insert_duplicate_code(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    repo.insert(NewMapping::new("dup", "https://a.com"))
        .await
        .unwrap();
    let result = repo.insert(NewMapping::new("dup", "https://b.com")).await;

    assert_eq!(result.unwrap_err(), StoreError::DuplicateCode("dup".to_string()));

    let stored = repo.find_by_code("dup").await.unwrap().unwrap();
    assert_eq!(stored.target, "https://a.com");
}

#[sqlx::test]
async fn test_find_by_code_is_case_sensitive(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    repo.insert(NewMapping::new("AbC", "https://upper.com"))
        .await
        .unwrap();

    assert!(repo.find_by_code("AbC").await.unwrap().is_some());
    assert!(repo.find_by_code("abc").await.unwrap().is_none());
    assert!(repo.exists("AbC").await.unwrap());
    assert!(!repo.exists("abc").await.unwrap());
}

#[sqlx::test]
async fn test_increment_visits(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    repo.insert(NewMapping::new("visit", "https://example.com"))
        .await
        .unwrap();
    repo.increment_visits("visit").await.unwrap();
    repo.increment_visits("visit").await.unwrap();

    let stored = repo.find_by_code("visit").await.unwrap().unwrap();
    assert_eq!(stored.visit_count, 2);
}

#[sqlx::test]
async fn test_increment_visits_missing_code(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    let result = repo.increment_visits("missing").await;

    assert_eq!(result.unwrap_err(), StoreError::NotFound("missing".to_string()));
}

#[sqlx::test]
async fn test_concurrent_increments(pool: PgPool) {
    let repo = Arc::new(PgMappingRepository::new(Arc::new(pool)));

    repo.insert(NewMapping::new("hot", "https://example.com"))
        .await
        .unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..50 {
        let repo = repo.clone();
        tasks.spawn(async move { repo.increment_visits("hot").await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let stored = repo.find_by_code("hot").await.unwrap().unwrap();
    assert_eq!(stored.visit_count, 50);
}

#[sqlx::test]
async fn test_count_and_ping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert_eq!(repo.count().await.unwrap(), 0);
    repo.insert(NewMapping::new("one", "https://1.com"))
        .await
        .unwrap();
    repo.insert(NewMapping::new("two", "https://2.com"))
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
    assert!(repo.ping().await.is_ok());
}
