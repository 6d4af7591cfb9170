//! # Scholaris Core
//!
//! Core types, errors, and utilities for the Scholaris API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: HTTP-facing [`AppError`] and the authentication taxonomy [`AuthError`]
//! - [`password`]: bcrypt hashing and the [`CredentialVerifier`] contract
//! - [`roles`]: account roles and statuses
//!
//! # Example
//!
//! ```ignore
//! use scholaris_core::{AppError, AuthError, Role};
//! use scholaris_core::password::{hash_password, verify_password};
//!
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//!
//! let error: AppError = AuthError::TokenExpired.into();
//! assert_eq!(error.code, Some("TOKEN_EXPIRED"));
//! ```

pub mod errors;
pub mod password;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError};
pub use password::{
    BcryptVerifier, CredentialVerifier, hash_password, hash_password_with_cost, verify_password,
};
pub use roles::{AccountStatus, Role};
