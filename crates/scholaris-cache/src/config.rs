//! Revocation list configuration.
//!
//! # Environment Variables
//!
//! - `REDIS_URL`: Redis connection URL. When unset the server keeps the
//!   revocation list in process memory.
//! - `CACHE_PREFIX`: Prefix for all revocation keys (default: `scholaris`)

use std::env;

#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Redis connection URL, if a shared store is configured.
    pub redis_url: Option<String>,

    /// Prefix for all keys to avoid collisions with other tenants of the instance.
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| "scholaris".into()),
        }
    }

    /// Build a prefixed key.
    ///
    /// ```ignore
    /// let key = CacheConfig::default().prefixed_key("revoked:abc");
    /// // Returns "scholaris:revoked:abc"
    /// ```
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "scholaris".into(),
        }
    }
}
