//! Authentication endpoints and the session issuer behind them.

pub mod controller;
pub mod router;
pub mod service;
