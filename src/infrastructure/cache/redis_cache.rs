//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "mapping:";

/// Redis cache for redirect lookups.
///
/// Shares one multiplexed connection through `ConnectionManager`, which
/// reconnects on its own. Every operation is fail-open.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl_seconds: u64,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` applies when [`CacheService::set_url`] gets no TTL
    /// (`CACHE_TTL_SECONDS`).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut probe = conn.clone();
        probe
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            conn,
            default_ttl_seconds,
        })
    }
}

fn cache_key(code: &str) -> String {
    format!("{KEY_PREFIX}{code}")
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(cache_key(code)).await {
            Ok(hit) => Ok(hit),
            Err(e) => {
                warn!(%code, "Redis GET error: {}", e);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        code: &str,
        target: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl_seconds);

        match conn.set_ex::<_, _, ()>(cache_key(code), target, ttl).await {
            Ok(()) => debug!(%code, ttl, "Cache SET"),
            Err(e) => warn!(%code, "Redis SET error: {}", e),
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_namespaced() {
        assert_eq!(cache_key("abc123"), "mapping:abc123");
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisCache::connect("not-a-redis-url", 60).await;
        assert!(matches!(result, Err(CacheError::ConnectionError(_))));
    }
}
