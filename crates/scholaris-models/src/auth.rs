//! Authentication request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use scholaris_auth::TokenPair;

use crate::accounts::Identity;

/// Login request with email and password.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "admin@school.com")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "admin123")]
    pub password: String,
}

/// Successful login: the authenticated account and a fresh token pair.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: Identity,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Request to rotate a refresh token into a new pair.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Request to revoke a refresh token.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LogoutRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Response of the optional-auth session check.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<Identity>,
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
