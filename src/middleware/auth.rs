//! Caller authentication.
//!
//! A request is authenticated in four steps:
//!
//! 1. read `Authorization: Bearer <token>`
//! 2. verify the access token (signature, issuer, audience, expiry)
//! 3. load the account by the token subject and require it to be active
//! 4. store the resulting [`Identity`] in the request extensions
//!
//! The account is looked up on every request, so a deactivated user is locked
//! out immediately even while their access token is still unexpired.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};

use scholaris_auth::{AccessClaims, bearer_token};
use scholaris_core::{AppError, AuthError};
use scholaris_models::Identity;

use crate::metrics::track_authorization_denied;
use crate::state::AppState;

/// Resolves the caller of a request from its headers.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AuthError::TokenMissing)?;

    let verified = state.codec.verify::<AccessClaims>(token)?;
    let user_id = verified.claims.user_id;

    let account = state.store.find_account(user_id).await.map_err(|e| {
        error!(user_id = %user_id, error = %e, "Account lookup failed during authentication");
        AuthError::from(e)
    })?;

    match account {
        Some(account) if account.status.is_active() => Ok(Identity::from(account)),
        Some(account) => {
            debug!(user_id = %user_id, status = %account.status, "Rejected inactive account");
            Err(AuthError::AccountInactive)
        }
        None => {
            debug!(user_id = %user_id, "Token subject no longer exists");
            Err(AuthError::AccountInactive)
        }
    }
}

/// Rejects unauthenticated requests and attaches the caller's [`Identity`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match authenticate(&state, req.headers()).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(err) => {
            track_authorization_denied("authentication", &err);
            if !matches!(err, AuthError::Unavailable(_)) {
                warn!(reason = %err, path = %req.uri().path(), "Authentication rejected");
            }
            Err(err.into())
        }
    }
}

/// Attaches an [`Identity`] when the request carries a usable token and
/// continues without one otherwise. Never rejects.
pub async fn optional_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match authenticate(&state, req.headers()).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
        }
        Err(AuthError::TokenMissing) => {}
        Err(err) => {
            debug!(reason = %err, "Optional authentication skipped");
        }
    }
    next.run(req).await
}

/// Extractor for the authenticated caller.
///
/// Reads the [`Identity`] placed by [`require_auth`] and falls back to
/// authenticating the request itself when no middleware ran.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthUser(identity.clone()));
        }

        let identity = authenticate(state, &parts.headers).await?;
        parts.extensions.insert(identity.clone());
        Ok(AuthUser(identity))
    }
}

/// Extractor for routes behind [`optional_auth`].
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Identity>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(parts.extensions.get::<Identity>().cloned()))
    }
}
