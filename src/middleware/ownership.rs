//! Per-resource ownership checks.
//!
//! A role that passed the [`role gate`](crate::middleware::role) may still
//! only see the records it is related to. Each `(role, resource type)`
//! combination maps to one [`OwnershipPredicate`] backed by exactly one store
//! query; a combination without a predicate is denied. Admins bypass the
//! check entirely.
//!
//! | Caller  | Resource | Owned when                                       |
//! |---------|----------|--------------------------------------------------|
//! | student | student  | the student record belongs to the caller         |
//! | parent  | student  | an active parent/student relationship exists     |
//! | teacher | student  | the caller teaches the student's current class   |
//! | teacher | teacher  | the teacher record belongs to the caller         |
//! | parent  | parent   | the parent record belongs to the caller          |

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    RequestPartsExt,
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use scholaris_core::{AppError, AuthError, Role};
use scholaris_db::{SchoolStore, StoreError};
use scholaris_models::{Identity, ResourceType};

use crate::metrics::track_authorization_denied;
use crate::state::AppState;

#[async_trait]
pub trait OwnershipPredicate: Send + Sync {
    async fn owns(
        &self,
        store: &dyn SchoolStore,
        caller: &Identity,
        resource_id: Uuid,
    ) -> Result<bool, StoreError>;
}

struct StudentSelf;

#[async_trait]
impl OwnershipPredicate for StudentSelf {
    async fn owns(
        &self,
        store: &dyn SchoolStore,
        caller: &Identity,
        resource_id: Uuid,
    ) -> Result<bool, StoreError> {
        store.student_belongs_to(resource_id, caller.user_id).await
    }
}

struct ParentOfStudent;

#[async_trait]
impl OwnershipPredicate for ParentOfStudent {
    async fn owns(
        &self,
        store: &dyn SchoolStore,
        caller: &Identity,
        resource_id: Uuid,
    ) -> Result<bool, StoreError> {
        store
            .parent_linked_to_student(caller.user_id, resource_id)
            .await
    }
}

struct TeacherOfStudent;

#[async_trait]
impl OwnershipPredicate for TeacherOfStudent {
    async fn owns(
        &self,
        store: &dyn SchoolStore,
        caller: &Identity,
        resource_id: Uuid,
    ) -> Result<bool, StoreError> {
        store
            .teacher_assigned_to_student(caller.user_id, resource_id)
            .await
    }
}

struct TeacherSelf;

#[async_trait]
impl OwnershipPredicate for TeacherSelf {
    async fn owns(
        &self,
        store: &dyn SchoolStore,
        caller: &Identity,
        resource_id: Uuid,
    ) -> Result<bool, StoreError> {
        store.teacher_belongs_to(resource_id, caller.user_id).await
    }
}

struct ParentSelf;

#[async_trait]
impl OwnershipPredicate for ParentSelf {
    async fn owns(
        &self,
        store: &dyn SchoolStore,
        caller: &Identity,
        resource_id: Uuid,
    ) -> Result<bool, StoreError> {
        store.parent_belongs_to(resource_id, caller.user_id).await
    }
}

/// Lookup table from `(role, resource type)` to its ownership predicate.
#[derive(Default)]
pub struct OwnershipRegistry {
    predicates: HashMap<(Role, ResourceType), Arc<dyn OwnershipPredicate>>,
}

impl std::fmt::Debug for OwnershipRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipRegistry")
            .field("combinations", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl OwnershipRegistry {
    /// The school's relationship rules.
    pub fn standard() -> Self {
        let mut registry = Self::default();
        registry
            .register(Role::Student, ResourceType::Student, StudentSelf)
            .register(Role::Parent, ResourceType::Student, ParentOfStudent)
            .register(Role::Teacher, ResourceType::Student, TeacherOfStudent)
            .register(Role::Teacher, ResourceType::Teacher, TeacherSelf)
            .register(Role::Parent, ResourceType::Parent, ParentSelf);
        registry
    }

    /// Adds or replaces the predicate for a combination.
    pub fn register<P>(&mut self, role: Role, resource_type: ResourceType, predicate: P) -> &mut Self
    where
        P: OwnershipPredicate + 'static,
    {
        self.predicates
            .insert((role, resource_type), Arc::new(predicate));
        self
    }

    pub fn has_predicate(&self, role: Role, resource_type: ResourceType) -> bool {
        self.predicates.contains_key(&(role, resource_type))
    }

    /// Decides whether `caller` may access `resource_id`.
    ///
    /// Runs at most one store query and caches nothing.
    pub async fn check(
        &self,
        store: &dyn SchoolStore,
        caller: &Identity,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> Result<(), AuthError> {
        if caller.is_admin() {
            return Ok(());
        }

        let Some(predicate) = self.predicates.get(&(caller.role, resource_type)) else {
            debug!(
                role = %caller.role,
                resource_type = %resource_type,
                "No ownership rule for combination"
            );
            return Err(AuthError::OwnershipDenied);
        };

        match predicate.owns(store, caller, resource_id).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(
                    user_id = %caller.user_id,
                    role = %caller.role,
                    resource_type = %resource_type,
                    resource_id = %resource_id,
                    "Resource not owned by caller"
                );
                Err(AuthError::OwnershipDenied)
            }
            Err(e) => {
                error!(
                    user_id = %caller.user_id,
                    role = %caller.role,
                    resource_type = %resource_type,
                    resource_id = %resource_id,
                    error = %e,
                    "Ownership lookup failed"
                );
                Err(e.into())
            }
        }
    }
}

/// State for [`ownership_gate`]: which path parameter holds the resource id
/// and what kind of record it names.
#[derive(Clone)]
pub struct OwnershipGuard {
    state: AppState,
    param: &'static str,
    resource_type: ResourceType,
}

/// Builds the guard for a route exposing `resource_type` records under `param`.
///
/// ```rust,ignore
/// Router::new()
///     .route("/{id}", get(get_student))
///     .route_layer(middleware::from_fn_with_state(
///         check_ownership(&state, "id", ResourceType::Student),
///         ownership_gate,
///     ))
/// ```
pub fn check_ownership(
    state: &AppState,
    param: &'static str,
    resource_type: ResourceType,
) -> OwnershipGuard {
    OwnershipGuard {
        state: state.clone(),
        param,
        resource_type,
    }
}

pub async fn ownership_gate(
    State(guard): State<OwnershipGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let result: Result<(), AuthError> = async {
        let caller = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)?;

        let Path(params) = parts
            .extract::<Path<HashMap<String, String>>>()
            .await
            .map_err(|e| AuthError::InvalidResourceId(e.body_text()))?;

        let raw = params
            .get(guard.param)
            .ok_or_else(|| AuthError::InvalidResourceId(format!("missing {}", guard.param)))?;
        let resource_id =
            Uuid::parse_str(raw).map_err(|_| AuthError::InvalidResourceId(raw.clone()))?;

        guard
            .state
            .ownership
            .check(
                guard.state.store.as_ref(),
                &caller,
                guard.resource_type,
                resource_id,
            )
            .await
    }
    .await;

    if let Err(err) = result {
        track_authorization_denied("ownership", &err);
        return Err(err.into());
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
