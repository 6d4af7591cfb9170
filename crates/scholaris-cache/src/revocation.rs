//! Deny-list of refresh token ids.
//!
//! An entry lives exactly as long as the token it blocks would have: once
//! the token expires on its own the entry is useless and may disappear.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use scholaris_core::AuthError;

use crate::redis::CacheError;

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Blocks `jti` for `ttl`. Revoking an already revoked id is a no-op.
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn is_revoked(&self, jti: &str) -> Result<bool, CacheError>;
}

/// Process-local revocation list, used when no Redis URL is configured and
/// in tests. Entries are purged lazily on write.
#[derive(Debug, Default)]
pub struct MemoryRevocationList {
    entries: Mutex<HashMap<String, Instant>>,
}

impl MemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|until| **until > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationList {
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.retain(|_, until| *until > now);
        entries.insert(jti.to_string(), now + ttl);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries
            .get(jti)
            .is_some_and(|until| *until > Instant::now()))
    }
}

impl From<CacheError> for AuthError {
    fn from(err: CacheError) -> Self {
        AuthError::Unavailable(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoke_and_check() {
        let list = MemoryRevocationList::new();
        assert!(!list.is_revoked("abc").await.unwrap());

        list.revoke("abc", Duration::from_secs(60)).await.unwrap();
        assert!(list.is_revoked("abc").await.unwrap());
        assert!(!list.is_revoked("other").await.unwrap());
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let list = MemoryRevocationList::new();
        list.revoke("abc", Duration::from_secs(60)).await.unwrap();
        list.revoke("abc", Duration::from_secs(60)).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let list = MemoryRevocationList::new();
        list.revoke("abc", Duration::ZERO).await.unwrap();
        assert!(!list.is_revoked("abc").await.unwrap());
        assert!(list.is_empty());
    }
}
