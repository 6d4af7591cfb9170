//! Application error types.
//!
//! Two layers live here:
//!
//! - [`AuthError`]: the authentication/authorization taxonomy produced by the
//!   token codec, the session issuer and the request guards.
//! - [`AppError`]: the HTTP-facing error every handler and middleware returns.
//!   It renders as `{ "error": <message>, "code": <code?> }`.
//!
//! Every [`AuthError`] maps to a fixed status, message and optional machine
//! code. Clients key their refresh logic on `TOKEN_EXPIRED` and
//! `INVALID_TOKEN`, so those strings must not change.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Client-facing code for an access token past its expiry.
pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
/// Client-facing code for any other token verification failure.
pub const INVALID_TOKEN: &str = "INVALID_TOKEN";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub code: Option<&'static str>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            code: None,
        }
    }

    /// Attaches a machine-readable code to the response body.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::internal(anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self.code {
            Some(code) => json!({
                "error": self.error.to_string(),
                "code": code,
            }),
            None => json!({
                "error": self.error.to_string()
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::internal(err)
    }
}

/// Authentication and authorization failures.
///
/// Token-layer variants come from the codec, session-layer variants from
/// login/refresh, request-layer variants from the role and ownership guards.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header missing or not a bearer token")]
    TokenMissing,

    #[error("token could not be parsed")]
    TokenMalformed,

    #[error("token signature, issuer or audience mismatch")]
    TokenInvalid,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account not found or inactive")]
    AccountInactive,

    #[error("no authenticated identity on request")]
    Unauthenticated,

    #[error("role not permitted on this route")]
    InsufficientRole,

    #[error("resource not found or not owned")]
    OwnershipDenied,

    #[error("resource id is not valid: {0}")]
    InvalidResourceId(String),

    #[error("failed to encode token: {0}")]
    TokenEncoding(String),

    #[error("authorization backend unavailable: {0}")]
    Unavailable(#[source] Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::TokenMissing
            | AuthError::TokenMalformed
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole | AuthError::OwnershipDenied => StatusCode::FORBIDDEN,
            AuthError::InvalidResourceId(_) => StatusCode::BAD_REQUEST,
            AuthError::TokenEncoding(_) | AuthError::Unavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            AuthError::TokenExpired => Some(TOKEN_EXPIRED),
            AuthError::TokenMalformed | AuthError::TokenInvalid => Some(INVALID_TOKEN),
            _ => None,
        }
    }

    /// The message shown to clients. Internal detail never leaves the process.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::TokenMissing => "Access token required",
            AuthError::TokenMalformed | AuthError::TokenInvalid => "Invalid token",
            AuthError::TokenExpired => "Token expired",
            AuthError::InvalidCredentials => "Invalid email or password",
            AuthError::AccountInactive => "User not found or inactive",
            AuthError::Unauthenticated => "Authentication required",
            AuthError::InsufficientRole => "Insufficient permissions",
            AuthError::OwnershipDenied => "Access denied - resource not found or not owned",
            AuthError::InvalidResourceId(_) => "Invalid resource id",
            AuthError::TokenEncoding(_) => "Failed to issue token",
            AuthError::Unavailable(_) => "Authorization check failed",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let error = AppError::new(err.status(), anyhow::anyhow!(err.public_message()));

        match err.code() {
            Some(code) => error.with_code(code),
            None => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_expired_token_carries_code() {
        let (status, body) = body_json(AuthError::TokenExpired.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "TOKEN_EXPIRED");
        assert_eq!(body["error"], "Token expired");
    }

    #[tokio::test]
    async fn test_malformed_and_invalid_share_code() {
        let (_, malformed) = body_json(AuthError::TokenMalformed.into()).await;
        let (_, invalid) = body_json(AuthError::TokenInvalid.into()).await;
        assert_eq!(malformed, invalid);
        assert_eq!(invalid["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_generic_auth_failure_has_no_code() {
        let (status, body) = body_json(AuthError::TokenMissing.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("code").is_none());
        assert_eq!(body["error"], "Access token required");
    }

    #[tokio::test]
    async fn test_unavailable_hides_source() {
        let err = AuthError::Unavailable(anyhow::anyhow!("connection refused on 10.0.0.4"));
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Authorization check failed");
    }

    #[test]
    fn test_forbidden_variants() {
        assert_eq!(AuthError::InsufficientRole.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::OwnershipDenied.status(), StatusCode::FORBIDDEN);
        assert!(AuthError::InsufficientRole.code().is_none());
    }
}
