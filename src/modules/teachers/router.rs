use axum::{Router, middleware, routing::get};

use scholaris_core::Role;
use scholaris_models::ResourceType;

use crate::middleware::auth::require_auth;
use crate::middleware::ownership::{check_ownership, ownership_gate};
use crate::middleware::role::{authorize, role_gate};
use crate::state::AppState;

use super::controller::get_teacher;

pub fn init_teachers_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_teacher))
        .route_layer(middleware::from_fn_with_state(
            check_ownership(state, "id", ResourceType::Teacher),
            ownership_gate,
        ))
        .route_layer(middleware::from_fn_with_state(
            authorize(&[Role::Admin, Role::Teacher]),
            role_gate,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
