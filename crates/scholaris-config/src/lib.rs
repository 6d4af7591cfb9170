//! # Scholaris Config
//!
//! Configuration types for the Scholaris API.
//!
//! Each structure is loaded from environment variables once at startup and
//! passed by value into the components that need it:
//!
//! - [`jwt`]: token secrets, lifetimes, issuer and audience
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: listener host and port
//! - [`duration`]: lifetime strings such as `24h` and `7d`
//!
//! # Example
//!
//! ```ignore
//! use scholaris_config::{CorsConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod duration;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use duration::parse_duration;
pub use jwt::{JwtConfig, MAX_TOKEN_LIFETIME, TOKEN_AUDIENCE, TOKEN_ISSUER};
pub use server::ServerConfig;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("JWT_SECRET and JWT_REFRESH_SECRET must differ")]
    SharedSecret,
}
