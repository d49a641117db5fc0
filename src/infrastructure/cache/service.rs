//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for code → target lookups on the redirect path.
///
/// Mappings never change once created, so entries are only ever written, never
/// invalidated. Implementations must be fail-open: a broken cache degrades to
/// store lookups and never fails a request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached target URL for a code.
    ///
    /// Returns `Ok(None)` on a miss. Backend errors are logged and reported as misses.
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores a target URL, expiring after `ttl_seconds` (implementation default if `None`).
    async fn set_url(&self, code: &str, target: &str, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Whether entries can be stored at all. Callers skip cache work when `false`.
    fn is_enabled(&self) -> bool {
        true
    }
}
