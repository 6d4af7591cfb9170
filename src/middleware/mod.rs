//! Request guards.
//!
//! - [`auth`]: bearer token authentication and the [`AuthUser`](auth::AuthUser) extractor
//! - [`role`]: static allowed-role sets per route
//! - [`ownership`]: per-record relationship checks
//!
//! Guards are attached with `route_layer`. Axum runs the layer added last
//! first, so routers add them in reverse: ownership, then role, then auth.

pub mod auth;
pub mod ownership;
pub mod role;
