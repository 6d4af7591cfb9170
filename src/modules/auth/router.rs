use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::{optional_auth, require_auth};
use crate::state::AppState;

use super::controller::{get_me, get_session, login_user, logout_user, refresh_token};

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout_user))
        .route(
            "/me",
            get(get_me).route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        )
        .route(
            "/session",
            get(get_session)
                .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth)),
        )
}
