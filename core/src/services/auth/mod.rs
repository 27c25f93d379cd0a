//! Authentication service module
//!
//! This module ties the token, refresh, revocation and rate limiting pieces
//! into the session flows:
//! - Email/password login guarded by a per-client attempt limiter
//! - Refresh token rotation
//! - Logout with access token revocation
//! - Bearer token authentication
//! - Password reset tickets

mod config;
mod login_guard;
mod notifier;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::SessionServiceConfig;
pub use login_guard::LoginAttemptGuard;
pub use notifier::PasswordResetNotifier;
pub use password::{hash_password, verify_password};
pub use service::{SessionService, RESET_COOLDOWN_PREFIX, RESET_KEY_PREFIX};
