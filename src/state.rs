//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::MappingService;
use crate::domain::repositories::MappingRepository;
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::cache::CacheService;

/// Mapping service over whichever store backend was configured at startup.
pub type SharedMappingService = Arc<MappingService<dyn MappingRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub mapping_service: SharedMappingService,
    pub cache: Arc<dyn CacheService>,
    /// Kept for queue health reporting; the service owns its own sender clone.
    pub visit_sender: mpsc::Sender<VisitEvent>,
}

impl AppState {
    /// Wires the mapping service around a store, a cache and the visit queue.
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        cache: Arc<dyn CacheService>,
        visit_sender: mpsc::Sender<VisitEvent>,
        base_url: impl Into<String>,
    ) -> Self {
        let mapping_service = Arc::new(MappingService::new(
            repository,
            cache.clone(),
            visit_sender.clone(),
            base_url,
        ));

        Self {
            mapping_service,
            cache,
            visit_sender,
        }
    }
}
