//! # Scholaris DB
//!
//! Database pool and the data store behind the authentication core.
//!
//! - [`SchoolStore`]: account lookups and relationship existence checks
//! - [`PgStore`]: PostgreSQL implementation over SQLx
//! - [`MemoryStore`]: in-process implementation for tests and demos
//!
//! # Example
//!
//! ```ignore
//! use scholaris_db::{PgStore, init_db_pool};
//!
//! let pool = init_db_pool(&database_url).await?;
//! let store = PgStore::new(pool);
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::SchoolStore;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a PostgreSQL pool.
///
/// Store calls inherit the pool's acquire timeout and nothing else.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::Database(e.into()))?;
    Ok(())
}
