//! Feature modules. Each has a `controller.rs` with the handlers and a
//! `router.rs` that declares the routes and their guards.

pub mod admin;
pub mod auth;
pub mod parents;
pub mod students;
pub mod teachers;
