//! Route handlers
//!
//! - `auth` - login, token refresh, logout and password reset
//! - `me` - identity of the authenticated caller

pub mod auth;
pub mod me;
