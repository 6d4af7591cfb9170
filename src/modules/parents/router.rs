use axum::{Router, middleware, routing::get};

use scholaris_core::Role;
use scholaris_models::ResourceType;

use crate::middleware::auth::require_auth;
use crate::middleware::ownership::{check_ownership, ownership_gate};
use crate::middleware::role::{authorize, role_gate};
use crate::state::AppState;

use super::controller::get_parent;

pub fn init_parents_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_parent))
        .route_layer(middleware::from_fn_with_state(
            check_ownership(state, "id", ResourceType::Parent),
            ownership_gate,
        ))
        .route_layer(middleware::from_fn_with_state(
            authorize(&[Role::Admin, Role::Parent]),
            role_gate,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
