//! # Scholaris Auth
//!
//! Token claims and the JWT codec for the Scholaris API.
//!
//! - [`claims`]: claim structures for access and refresh tokens
//! - [`jwt`]: [`TokenCodec`], which signs and verifies both kinds
//!
//! # Token Types
//!
//! - **Access Token** ([`AccessClaims`]): authorizes API calls, default lifetime 24h
//! - **Refresh Token** ([`RefreshClaims`]): exchanged for a new pair, default lifetime 7d
//!
//! The two kinds are signed with different secrets.
//!
//! # Example
//!
//! ```ignore
//! use scholaris_auth::{AccessClaims, TokenCodec};
//! use scholaris_config::JwtConfig;
//!
//! let codec = TokenCodec::new(&JwtConfig::from_env()?);
//! let issued = codec.issue(&claims)?;
//! let verified = codec.verify::<AccessClaims>(&issued.token)?;
//! println!("User ID: {}", verified.claims.user_id);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{AccessClaims, RefreshClaims, SignedClaims, TokenClaims, TokenKind};
pub use jwt::{IssuedToken, TokenCodec, TokenPair, bearer_token};
