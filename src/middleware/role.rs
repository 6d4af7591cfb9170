//! Role-based route authorization.
//!
//! Each protected router declares its allowed roles once, at construction:
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use crate::middleware::role::{authorize, role_gate};
//! use scholaris_core::Role;
//!
//! let teacher_routes = Router::new()
//!     .route("/{id}", get(get_teacher))
//!     .route_layer(middleware::from_fn_with_state(
//!         authorize(&[Role::Admin, Role::Teacher]),
//!         role_gate,
//!     ));
//! ```
//!
//! The gate only reads the [`Identity`] attached by
//! [`require_auth`](crate::middleware::auth::require_auth); it never touches
//! the store, so it must be layered inside the authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use scholaris_core::{AppError, AuthError, Role};
use scholaris_models::Identity;

use crate::metrics::track_authorization_denied;

/// The immutable set of roles allowed on a route.
#[derive(Debug, Clone)]
pub struct RolePolicy {
    allowed: Arc<[Role]>,
}

/// Builds the policy for a route.
pub fn authorize(allowed: &[Role]) -> RolePolicy {
    RolePolicy {
        allowed: Arc::from(allowed),
    }
}

impl RolePolicy {
    /// Decides a request without performing any I/O.
    pub fn check(&self, identity: Option<&Identity>) -> Result<(), AuthError> {
        let identity = identity.ok_or(AuthError::Unauthenticated)?;

        if !identity.has_any_role(&self.allowed) {
            warn!(
                user_id = %identity.user_id,
                role = %identity.role,
                required = ?self.allowed,
                "Role not permitted on route"
            );
            return Err(AuthError::InsufficientRole);
        }

        Ok(())
    }
}

/// Middleware evaluating a [`RolePolicy`] against the current caller.
pub async fn role_gate(
    State(policy): State<RolePolicy>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(err) = policy.check(req.extensions().get::<Identity>()) {
        track_authorization_denied("role", &err);
        return Err(err.into());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholaris_core::AccountStatus;
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: format!("{}@school.com", role),
            role,
            status: AccountStatus::Active,
            last_login: None,
        }
    }

    #[test]
    fn test_allowed_role_passes() {
        let policy = authorize(&[Role::Admin, Role::Teacher]);
        assert!(policy.check(Some(&identity(Role::Teacher))).is_ok());
        assert!(policy.check(Some(&identity(Role::Admin))).is_ok());
    }

    #[test]
    fn test_other_role_is_forbidden() {
        let policy = authorize(&[Role::Admin, Role::Teacher]);
        assert!(matches!(
            policy.check(Some(&identity(Role::Parent))),
            Err(AuthError::InsufficientRole)
        ));
    }

    #[test]
    fn test_missing_identity_is_unauthenticated() {
        let policy = authorize(&Role::ALL);
        assert!(matches!(
            policy.check(None),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_empty_policy_denies_everyone() {
        let policy = authorize(&[]);
        for role in Role::ALL {
            assert!(policy.check(Some(&identity(role))).is_err());
        }
    }
}
