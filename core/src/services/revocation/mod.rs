//! Access token deny-list keyed by `jti`

mod registry;

#[cfg(test)]
mod tests;

pub use registry::{RevocationRegistry, BLACKLIST_KEY_PREFIX};
