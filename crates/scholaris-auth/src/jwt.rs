//! Token creation and verification.
//!
//! [`TokenCodec`] holds one key pair per [`TokenKind`]. Secrets come from
//! [`JwtConfig`] at construction and never from the environment afterwards.
//!
//! # Verification failures
//!
//! | Cause                                   | Error                        |
//! |-----------------------------------------|------------------------------|
//! | `exp` in the past                       | [`AuthError::TokenExpired`]  |
//! | bad signature, wrong `iss` or `aud`     | [`AuthError::TokenInvalid`]  |
//! | not three segments, bad base64 or JSON  | [`AuthError::TokenMalformed`]|
//!
//! The signature is checked before any registered claim, so a token signed
//! with the other kind's secret is `TokenInvalid` even when it has expired.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use scholaris_config::JwtConfig;
use scholaris_core::AuthError;

use crate::claims::{AccessClaims, RefreshClaims, SignedClaims, TokenClaims, TokenKind};

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl SigningKeys {
    fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }
}

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Access and refresh tokens returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds, for scheduling a proactive refresh.
    pub expires_in: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_expires_in: u64,
}

/// Signs and verifies access and refresh tokens.
pub struct TokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
    issuer: String,
    audience: String,
    leeway_secs: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_lifetime", &self.access.lifetime)
            .field("refresh_lifetime", &self.refresh.lifetime)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: SigningKeys::new(&config.access_secret, config.access_token_expiry),
            refresh: SigningKeys::new(&config.refresh_secret, config.refresh_token_expiry),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            leeway_secs: config.leeway_secs,
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Configured lifetime of tokens of `kind`.
    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        self.keys(kind).lifetime
    }

    /// How long a revoked token id must stay blocked, measured from `now`.
    ///
    /// [`verify`](Self::verify) keeps accepting a token until `exp + leeway`,
    /// so the entry outlives that instant by one second and never drops
    /// below one second.
    pub fn revocation_ttl<C>(&self, signed: &SignedClaims<C>, now: i64) -> Duration {
        let leeway = i64::try_from(self.leeway_secs).unwrap_or(i64::MAX);
        let accepted_until = signed.exp.saturating_add(leeway).saturating_add(1);
        let secs = accepted_until.saturating_sub(now).max(1);
        Duration::from_secs(secs.unsigned_abs())
    }

    /// Signs `claims` with the secret of its kind, issued now.
    pub fn issue<C: TokenClaims>(&self, claims: &C) -> Result<IssuedToken, AuthError> {
        self.issue_at(claims, Utc::now())
    }

    /// Signs `claims` as if issued at `issued_at`.
    pub fn issue_at<C: TokenClaims>(
        &self,
        claims: &C,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let keys = self.keys(C::KIND);
        let lifetime = chrono::Duration::from_std(keys.lifetime)
            .map_err(|e| AuthError::TokenEncoding(format!("lifetime out of range: {}", e)))?;
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .ok_or_else(|| AuthError::TokenEncoding("lifetime out of range".to_string()))?;

        let signed = SignedClaims {
            claims,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &signed, &keys.encoding)
            .map_err(|e| AuthError::TokenEncoding(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies signature, issuer, audience and expiry for a token of kind `C`.
    pub fn verify<C: TokenClaims>(&self, token: &str) -> Result<SignedClaims<C>, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = self.leeway_secs;

        decode::<SignedClaims<C>>(token, &self.keys(C::KIND).decoding, &validation)
            .map(|data| data.claims)
            .map_err(classify)
    }

    /// Issues an access token and a refresh token together.
    pub fn issue_pair(
        &self,
        access: &AccessClaims,
        refresh: &RefreshClaims,
    ) -> Result<TokenPair, AuthError> {
        let access_token = self.issue(access)?;
        let refresh_token = self.issue(refresh)?;

        Ok(TokenPair {
            access_token: access_token.token,
            refresh_token: refresh_token.token,
            token_type: "Bearer".to_string(),
            expires_in: self.lifetime(TokenKind::Access).as_secs(),
            refresh_expires_in: self.lifetime(TokenKind::Refresh).as_secs(),
        })
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            AuthError::TokenMalformed
        }
        _ => AuthError::TokenInvalid,
    }
}

/// Pulls the token out of an `Authorization` header value.
///
/// Expects exactly `Bearer <token>` with a non-empty token.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
