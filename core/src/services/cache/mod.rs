//! Cache collaborator
//!
//! - `traits` - the `CacheService` key/value contract
//! - `memory` - process-local implementation with lazy TTL expiry
//! - `bounded` - wrapper that caps every round trip with a timeout
//! - `pattern` - glob matching for `clear_pattern`

mod bounded;
mod memory;
mod pattern;
mod traits;

#[cfg(test)]
mod tests;

pub use bounded::BoundedCache;
pub use memory::MemoryCache;
pub use pattern::glob_match;
pub use traits::CacheService;
