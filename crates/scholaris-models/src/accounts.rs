//! Account records and the per-request caller identity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use scholaris_core::{AccountStatus, Role};

/// A row of the `users` table without its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub last_login: Option<DateTime<Utc>>,
}

/// An account together with its password hash. Only the login path reads this.
#[derive(Clone)]
pub struct Credentials {
    pub account: Account,
    pub password_hash: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// The authenticated caller of a single request.
///
/// Built from a verified access token plus a fresh account lookup and
/// stored in the request extensions. It is never cached between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub last_login: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

impl From<Account> for Identity {
    fn from(account: Account) -> Self {
        Self {
            user_id: account.id,
            email: account.email,
            role: account.role,
            status: account.status,
            last_login: account.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Role) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: "someone@school.com".to_string(),
            role,
            status: AccountStatus::Active,
            last_login: None,
        }
    }

    #[test]
    fn test_identity_from_account() {
        let account = account(Role::Teacher);
        let identity = Identity::from(account.clone());
        assert_eq!(identity.user_id, account.id);
        assert_eq!(identity.role, Role::Teacher);
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_has_any_role() {
        let identity = Identity::from(account(Role::Parent));
        assert!(identity.has_any_role(&[Role::Admin, Role::Parent]));
        assert!(!identity.has_any_role(&[Role::Admin, Role::Teacher]));
        assert!(!identity.has_any_role(&[]));
    }

    #[test]
    fn test_credentials_debug_hides_hash() {
        let credentials = Credentials {
            account: account(Role::Admin),
            password_hash: "$2b$12$secret-hash".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("secret-hash"));
    }
}
