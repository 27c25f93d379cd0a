//! # SessionGuard Core
//!
//! Domain layer for the SessionGuard backend: access token issuance and
//! verification, refresh token rotation, the revocation registry, per-client
//! rate limiting and the session flows built on them. Storage is reached
//! through the `CacheService` and `UserRepository` traits.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
