//! JWT claim structures.
//!
//! - [`AccessClaims`]: `{ userId, email, userType, status }`, authorizes API calls
//! - [`RefreshClaims`]: `{ userId, userType }` plus a token id, authorizes minting a new pair
//! - [`SignedClaims`]: the registered fields (`iss`, `aud`, `iat`, `exp`) wrapped around either
//!
//! The token kind is carried by the claim type. The codec picks the signing
//! secret from [`TokenClaims::KIND`], so a refresh token can never decode as
//! an access token.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scholaris_core::{AccountStatus, Role};

/// The two token classes, each with its own secret and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim set that can be signed by the [`TokenCodec`](crate::jwt::TokenCodec).
pub trait TokenClaims: Serialize + DeserializeOwned {
    const KIND: TokenKind;

    /// The account the token was issued to.
    fn subject(&self) -> Uuid;
}

/// Claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: Uuid,
    pub email: String,
    pub user_type: Role,
    pub status: AccountStatus,
}

impl TokenClaims for AccessClaims {
    const KIND: TokenKind = TokenKind::Access;

    fn subject(&self) -> Uuid {
        self.user_id
    }
}

/// Claims embedded in refresh tokens.
///
/// `jti` is the registered token id; it keys the revocation list and makes
/// every refresh token unique even when two are minted in the same second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub user_id: Uuid,
    pub user_type: Role,
    pub jti: String,
}

impl RefreshClaims {
    /// New refresh claims with a fresh random token id.
    pub fn new(user_id: Uuid, user_type: Role) -> Self {
        Self {
            user_id,
            user_type,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

impl TokenClaims for RefreshClaims {
    const KIND: TokenKind = TokenKind::Refresh;

    fn subject(&self) -> Uuid {
        self.user_id
    }
}

/// A claim set plus the registered fields added at signing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaims<C> {
    #[serde(flatten)]
    pub claims: C,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_wire_names() {
        let claims = AccessClaims {
            user_id: Uuid::nil(),
            email: "admin@school.com".to_string(),
            user_type: Role::Admin,
            status: AccountStatus::Active,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], Uuid::nil().to_string());
        assert_eq!(json["email"], "admin@school.com");
        assert_eq!(json["userType"], "admin");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_refresh_claims_carry_no_email_or_status() {
        let claims = RefreshClaims::new(Uuid::new_v4(), Role::Parent);
        let json = serde_json::to_value(&claims).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("email").is_none());
        assert!(json.get("status").is_none());
        assert_eq!(json["userType"], "parent");
    }

    #[test]
    fn test_refresh_ids_are_unique() {
        let user = Uuid::new_v4();
        assert_ne!(
            RefreshClaims::new(user, Role::Student).jti,
            RefreshClaims::new(user, Role::Student).jti
        );
    }

    #[test]
    fn test_signed_claims_flatten() {
        let signed = SignedClaims {
            claims: RefreshClaims::new(Uuid::nil(), Role::Teacher),
            iss: "iss".to_string(),
            aud: "aud".to_string(),
            iat: 100,
            exp: 200,
        };
        let json = serde_json::to_value(&signed).unwrap();
        assert_eq!(json["userType"], "teacher");
        assert_eq!(json["exp"], 200);
    }
}
