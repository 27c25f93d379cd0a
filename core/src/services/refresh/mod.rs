//! Refresh token module
//!
//! Opaque long-lived credentials persisted in the cache, rotated on use and
//! revocable on logout.

mod store;

#[cfg(test)]
mod tests;

pub use store::{fingerprint, RefreshStoreConfig, RefreshTokenStore, Rotation, REFRESH_KEY_PREFIX};
