//! End-to-end behavior of the mapping service over the in-memory store,
//! with the visit worker running.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use url_mapper::application::services::MappingService;
use url_mapper::domain::repositories::MappingRepository;
use url_mapper::domain::visit_worker::run_visit_worker;
use url_mapper::error::AppError;
use url_mapper::infrastructure::cache::NullCache;
use url_mapper::infrastructure::persistence::MemoryMappingRepository;

const BASE_URL: &str = "http://localhost:3000";

fn service_with_worker(
    queue_capacity: usize,
) -> (
    Arc<MappingService<MemoryMappingRepository>>,
    Arc<MemoryMappingRepository>,
    JoinHandle<()>,
) {
    let repo = Arc::new(MemoryMappingRepository::new());
    let (tx, rx) = mpsc::channel(queue_capacity);
    let worker = tokio::spawn(run_visit_worker(rx, repo.clone(), 8));
    let service = Arc::new(MappingService::new(
        repo.clone(),
        Arc::new(NullCache),
        tx,
        BASE_URL,
    ));

    (service, repo, worker)
}

#[tokio::test]
async fn test_create_resolve_and_stats_round_trip() {
    let (service, repo, worker) = service_with_worker(16);

    let created = service
        .create_short_mapping("https://a.com".to_string(), Some("my-link".to_string()))
        .await
        .unwrap();
    assert_eq!(created.code, "my-link");
    assert_eq!(service.short_url(&created.code), "http://localhost:3000/r/my-link");

    for _ in 0..3 {
        let target = service.resolve_and_count("my-link").await.unwrap();
        assert_eq!(target, "https://a.com");
    }

    drop(service);
    worker.await.unwrap();

    let stored = repo.find_by_code("my-link").await.unwrap().unwrap();
    assert_eq!(stored.visit_count, 3);
    assert_eq!(stored.target, "https://a.com");
}

#[tokio::test]
async fn test_resolve_unknown_code_counts_nothing() {
    let (service, repo, worker) = service_with_worker(16);

    let err = service.resolve_and_count("nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let err = service.get_stats("nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    drop(service);
    worker.await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_same_target_gets_distinct_codes() {
    let (service, _repo, _worker) = service_with_worker(16);

    let first = service
        .create_short_mapping("https://dup.com".to_string(), None)
        .await
        .unwrap();
    let second = service
        .create_short_mapping("https://dup.com".to_string(), None)
        .await
        .unwrap();

    assert_ne!(first.code, second.code);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_code_has_single_winner() {
    const CONTENDERS: usize = 32;

    let (service, repo, _worker) = service_with_worker(16);
    let mut tasks = JoinSet::new();

    for i in 0..CONTENDERS {
        let service = service.clone();
        tasks.spawn(async move {
            service
                .create_short_mapping(format!("https://site{i}.com"), Some("contested".to_string()))
                .await
        });
    }

    let mut created = Vec::new();
    let mut conflicts = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(mapping) => created.push(mapping),
            Err(AppError::Conflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(created.len(), 1);
    assert_eq!(conflicts, CONTENDERS - 1);

    let stored = repo.find_by_code("contested").await.unwrap().unwrap();
    assert_eq!(stored.target, created[0].target);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_are_all_counted() {
    const VISITS: usize = 200;

    let (service, repo, worker) = service_with_worker(VISITS);
    service
        .create_short_mapping("https://popular.com".to_string(), Some("hot".to_string()))
        .await
        .unwrap();

    let mut tasks = JoinSet::new();
    for _ in 0..VISITS {
        let service = service.clone();
        tasks.spawn(async move { service.resolve_and_count("hot").await });
    }
    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap().unwrap(), "https://popular.com");
    }

    drop(service);
    worker.await.unwrap();

    let stats = repo.find_by_code("hot").await.unwrap().unwrap();
    assert_eq!(stats.visit_count, VISITS as i64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generated_codes_are_unique() {
    const CREATES: usize = 100;

    let (service, repo, _worker) = service_with_worker(16);
    let mut tasks = JoinSet::new();

    for i in 0..CREATES {
        let service = service.clone();
        tasks.spawn(async move {
            service
                .create_short_mapping(format!("https://many.com/{i}"), None)
                .await
        });
    }

    let mut codes = std::collections::HashSet::new();
    while let Some(result) = tasks.join_next().await {
        codes.insert(result.unwrap().unwrap().code);
    }

    assert_eq!(codes.len(), CREATES);
    assert_eq!(repo.count().await.unwrap(), CREATES as i64);
}

#[tokio::test]
async fn test_target_with_control_characters_is_not_stored() {
    let (service, repo, _worker) = service_with_worker(16);

    for target in ["https://example.com/a\nb", "https://example.com/a\tb"] {
        let err = service
            .create_short_mapping(target.to_string(), Some("ctrl".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    assert_eq!(repo.count().await.unwrap(), 0);
}
