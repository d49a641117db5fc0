//! Mapping creation, resolution and statistics service.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::application::services::CodeAllocator;
use crate::domain::entities::{Mapping, MappingStats, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreError};
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use crate::utils::target_url::validate_target_url;

/// Maximum insert attempts for generated codes that lose a race at the store.
pub const MAX_INSERT_ATTEMPTS: usize = 5;

/// Facade over the mapping store.
///
/// One instance lives for the whole process and is shared between requests.
/// It holds no per-request state: uniqueness and counting rely entirely on
/// store-level atomicity.
pub struct MappingService<R: MappingRepository + ?Sized, G: CodeGenerator = RandomCodeGenerator> {
    repository: Arc<R>,
    allocator: CodeAllocator<R, G>,
    cache: Arc<dyn CacheService>,
    visits: mpsc::Sender<VisitEvent>,
    base_url: String,
}

impl<R: MappingRepository + ?Sized> MappingService<R> {
    /// Creates a service that generates random alphanumeric codes.
    ///
    /// # Arguments
    ///
    /// - `repository` - the mapping store
    /// - `cache` - read-through cache for the redirect path
    /// - `visits` - queue consumed by [`crate::domain::visit_worker::run_visit_worker`]
    /// - `base_url` - prefix for public short URLs, e.g. `https://sho.rt`
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        visits: mpsc::Sender<VisitEvent>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::with_generator(repository, RandomCodeGenerator, cache, visits, base_url)
    }
}

impl<R: MappingRepository + ?Sized, G: CodeGenerator> MappingService<R, G> {
    /// Creates a service with a custom code source.
    pub fn with_generator(
        repository: Arc<R>,
        generator: G,
        cache: Arc<dyn CacheService>,
        visits: mpsc::Sender<VisitEvent>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            allocator: CodeAllocator::with_generator(repository.clone(), generator),
            repository,
            cache,
            visits,
            base_url: base_url.into(),
        }
    }

    /// Creates a mapping for `target`, using `requested_code` if given.
    ///
    /// # Races
    ///
    /// The availability pre-check and the insert are separate operations. When a
    /// concurrent request wins the insert for the same custom code, the store's
    /// duplicate rejection is reported as [`AppError::Conflict`]. A generated code
    /// that loses such a race is replaced and the insert retried.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `target` is not a storable URL.
    /// Returns [`AppError::Conflict`] if the custom code is already in use.
    /// Returns [`AppError::AllocationExhausted`] if no free generated code was found.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create_short_mapping(
        &self,
        target: String,
        requested_code: Option<String>,
    ) -> Result<Mapping, AppError> {
        validate_target_url(&target)?;

        let mapping = match requested_code {
            Some(requested) => self.create_with_custom_code(target, &requested).await?,
            None => self.create_with_generated_code(target).await?,
        };

        metrics::counter!("mappings_created_total").increment(1);
        info!(code = %mapping.code, target = %mapping.target, "Mapping created");

        Ok(mapping)
    }

    async fn create_with_custom_code(
        &self,
        target: String,
        requested: &str,
    ) -> Result<Mapping, AppError> {
        let code = self.allocator.allocate(Some(requested)).await?;

        match self.repository.insert(NewMapping::new(code, target)).await {
            Ok(mapping) => Ok(mapping),
            Err(StoreError::DuplicateCode(code)) => {
                debug!(%code, "Custom code taken by a concurrent insert");
                Err(AppError::conflict(
                    "Custom code is already in use",
                    json!({ "code": code }),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_with_generated_code(&self, target: String) -> Result<Mapping, AppError> {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let code = self.allocator.allocate(None).await?;

            match self
                .repository
                .insert(NewMapping::new(code, target.clone()))
                .await
            {
                Ok(mapping) => return Ok(mapping),
                Err(StoreError::DuplicateCode(code)) => {
                    warn!(%code, attempt, "Generated code lost insert race, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::allocation_exhausted(
            "Failed to generate unique code",
            json!({ "attempts": MAX_INSERT_ATTEMPTS }),
        ))
    }

    /// Resolves `code` to its target URL and queues one visit.
    ///
    /// The visit is recorded asynchronously. A full or closed queue drops it
    /// with a warning; the target is returned either way.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping matches; nothing is recorded.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve_and_count(&self, code: &str) -> Result<String, AppError> {
        let target = match self.cached_target(code).await {
            Some(target) => target,
            None => {
                let mapping = self.lookup(code).await?;
                self.warm_cache(&mapping);
                mapping.target
            }
        };

        self.enqueue_visit(code);

        Ok(target)
    }

    /// Returns the target and current visit count for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping matches.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_stats(&self, code: &str) -> Result<MappingStats, AppError> {
        self.lookup(code).await.map(MappingStats::from)
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/r/{}", self.base_url, code)
    }

    /// Verifies the mapping store is reachable.
    pub async fn ping_store(&self) -> Result<(), AppError> {
        self.repository.ping().await.map_err(AppError::from)
    }

    async fn lookup(&self, code: &str) -> Result<Mapping, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))
    }

    async fn cached_target(&self, code: &str) -> Option<String> {
        if !self.cache.is_enabled() {
            return None;
        }

        match self.cache.get_url(code).await {
            Ok(Some(target)) => {
                metrics::counter!("cache_hits_total").increment(1);
                Some(target)
            }
            Ok(None) | Err(_) => {
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
        }
    }

    fn warm_cache(&self, mapping: &Mapping) {
        if !self.cache.is_enabled() {
            return;
        }

        let cache = self.cache.clone();
        let code = mapping.code.clone();
        let target = mapping.target.clone();

        tokio::spawn(async move {
            if let Err(e) = cache.set_url(&code, &target, None).await {
                warn!(%code, "Failed to cache target: {}", e);
            }
        });
    }

    fn enqueue_visit(&self, code: &str) {
        match self.visits.try_send(VisitEvent::new(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("visits_dropped_total").increment(1);
                warn!(code = %event.code, "Visit queue full, visit dropped");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("visits_dropped_total").increment(1);
                warn!(code = %event.code, "Visit queue closed, visit dropped");
            }
        }
    }
}
