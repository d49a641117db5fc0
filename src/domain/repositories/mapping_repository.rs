//! Repository trait for mapping storage.

use crate::domain::entities::{Mapping, NewMapping};
use async_trait::async_trait;

/// Errors reported by a mapping store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store's uniqueness constraint rejected the insert.
    #[error("Code already exists: {0}")]
    DuplicateCode(String),

    /// No record matches the code.
    #[error("Mapping not found: {0}")]
    NotFound(String),

    /// Connectivity, timeout or any other backend fault.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Repository interface over the durable mapping store.
///
/// Uniqueness of `code` is enforced by the store itself; callers must treat
/// [`StoreError::DuplicateCode`] from [`MappingRepository::insert`] as the
/// authoritative answer, whatever an earlier [`MappingRepository::exists`] said.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryMappingRepository`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping with `visit_count = 0` and `created_at = now`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCode`] if the code already exists.
    /// Returns [`StoreError::Backend`] on storage errors.
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError>;

    /// Finds a mapping by exact code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError>;

    /// Returns whether a mapping with this code exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on storage errors.
    async fn exists(&self, code: &str) -> Result<bool, StoreError>;

    /// Atomically increments `visit_count` by one.
    ///
    /// Implemented as a single update at the store, never as read-modify-write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no mapping matches `code`.
    /// Returns [`StoreError::Backend`] on storage errors.
    async fn increment_visits(&self, code: &str) -> Result<(), StoreError>;

    /// Counts all mappings.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
