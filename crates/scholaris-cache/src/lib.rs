//! # Scholaris Cache
//!
//! Refresh token revocation for the Scholaris API.
//!
//! - [`RevocationStore`]: the deny-list contract, keyed by token id
//! - [`RedisRevocationStore`]: shared list backed by Redis `SETEX`/`EXISTS`
//! - [`MemoryRevocationList`]: single-process fallback
//!
//! # Example
//!
//! ```ignore
//! use scholaris_cache::{CacheConfig, connect_revocation_store};
//!
//! let revocations = connect_revocation_store(CacheConfig::from_env()).await?;
//! revocations.revoke(&jti, Duration::from_secs(3600)).await?;
//! ```

pub mod config;
pub mod redis;
pub mod revocation;

use std::sync::Arc;

pub use config::CacheConfig;
pub use redis::{CacheError, RedisRevocationStore};
pub use revocation::{MemoryRevocationList, RevocationStore};

/// Picks Redis when `REDIS_URL` is configured, otherwise the in-process list.
pub async fn connect_revocation_store(
    config: CacheConfig,
) -> Result<Arc<dyn RevocationStore>, CacheError> {
    match config.redis_url.clone() {
        Some(url) => {
            let store = RedisRevocationStore::new(&url, config).await?;
            tracing::info!("Using Redis revocation list");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("REDIS_URL not set, revocation list is local to this process");
            Ok(Arc::new(MemoryRevocationList::new()))
        }
    }
}
