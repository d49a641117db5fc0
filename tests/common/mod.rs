#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use url_mapper::domain::entities::NewMapping;
use url_mapper::domain::repositories::MappingRepository;
use url_mapper::domain::visit_event::VisitEvent;
use url_mapper::infrastructure::cache::NullCache;
use url_mapper::infrastructure::persistence::MemoryMappingRepository;
use url_mapper::state::AppState;

pub const BASE_URL: &str = "http://localhost:3000";

pub async fn create_test_mapping(repo: &MemoryMappingRepository, code: &str, url: &str) {
    repo.insert(NewMapping::new(code, url)).await.unwrap();
}

/// Applies every queued visit to the store, standing in for the worker.
pub async fn drain_visits(repo: &MemoryMappingRepository, rx: &mut mpsc::Receiver<VisitEvent>) -> usize {
    let mut applied = 0;
    while let Ok(event) = rx.try_recv() {
        assert!(event.resolved_at <= Utc::now());
        repo.increment_visits(&event.code).await.unwrap();
        applied += 1;
    }
    applied
}

pub fn create_test_state() -> (
    AppState,
    Arc<MemoryMappingRepository>,
    mpsc::Receiver<VisitEvent>,
) {
    let (tx, rx) = mpsc::channel(100);
    let repo = Arc::new(MemoryMappingRepository::new());

    let state = AppState::new(repo.clone(), Arc::new(NullCache), tx, BASE_URL);

    (state, repo, rx)
}
