//! # SessionGuard API
//!
//! actix-web surface over the session service: auth routes, per-client
//! request throttling and bearer token authentication.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::AppState;
