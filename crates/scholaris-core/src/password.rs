//! Password hashing and credential verification.
//!
//! Passwords are stored as bcrypt hashes. The session issuer only depends on
//! the [`CredentialVerifier`] contract so the hashing primitive stays swappable.

use std::sync::OnceLock;

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

/// One-way comparison of a plaintext secret against a stored hash.
pub trait CredentialVerifier: Send + Sync {
    /// Returns `false` for a mismatch and for an unparseable stored hash.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;

    /// Does the work of a failed [`verify`](Self::verify) for a login with no
    /// stored hash, so response time does not reveal whether the account exists.
    fn verify_absent(&self, plaintext: &str) {
        let _ = plaintext;
    }
}

/// A hash of a fixed secret at the default cost, computed on first use.
fn placeholder_hash() -> Option<&'static str> {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| hash("scholaris-placeholder-credential", DEFAULT_COST).ok())
        .as_deref()
}

/// bcrypt-backed [`CredentialVerifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptVerifier;

impl CredentialVerifier for BcryptVerifier {
    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        verify_password(plaintext, hash).unwrap_or(false)
    }

    fn verify_absent(&self, plaintext: &str) {
        if let Some(hash) = placeholder_hash() {
            let _ = verify(plaintext, hash);
        }
    }
}
