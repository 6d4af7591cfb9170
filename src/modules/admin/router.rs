use axum::{Router, middleware, routing::get};

use scholaris_core::Role;

use crate::middleware::auth::require_auth;
use crate::middleware::role::{authorize, role_gate};
use crate::state::AppState;

use super::controller::get_account;

pub fn init_admin_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/accounts/{id}", get(get_account))
        .route_layer(middleware::from_fn_with_state(
            authorize(&[Role::Admin]),
            role_gate,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
