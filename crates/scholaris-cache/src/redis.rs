//! Redis-backed revocation list, shared by every server instance.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, instrument};

use crate::config::CacheConfig;
use crate::revocation::RevocationStore;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Revocation list lock poisoned")]
    Poisoned,
}

#[derive(Clone)]
pub struct RedisRevocationStore {
    conn: ConnectionManager,
    config: CacheConfig,
}

impl std::fmt::Debug for RedisRevocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRevocationStore")
            .field("key_prefix", &self.config.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisRevocationStore {
    /// Connects to `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if connection fails.
    pub async fn new(redis_url: &str, config: CacheConfig) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn, config })
    }

    fn key(&self, jti: &str) -> String {
        self.config.prefixed_key(&format!("revoked:{}", jti))
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    #[instrument(skip(self), fields(cache.operation = "SETEX"))]
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<(), CacheError> {
        // SETEX rejects a zero expiry; an already expired token needs no entry.
        if ttl.as_secs() == 0 {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        let key = self.key(jti);
        conn.set_ex::<_, _, ()>(&key, 1, ttl.as_secs()).await?;

        debug!(cache.key = %key, cache.ttl_secs = %ttl.as_secs(), "Token revoked");
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "EXISTS"))]
    async fn is_revoked(&self, jti: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.exists::<_, bool>(self.key(jti)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_revoke_round_trip() {
        let store = RedisRevocationStore::new("redis://localhost:6379", CacheConfig::default())
            .await
            .unwrap();

        store
            .revoke("test-jti", Duration::from_secs(30))
            .await
            .unwrap();
        assert!(store.is_revoked("test-jti").await.unwrap());
        assert!(!store.is_revoked("never-revoked").await.unwrap());
    }
}
