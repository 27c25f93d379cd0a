use async_trait::async_trait;
use std::time::Duration;

use crate::errors::CacheError;

/// Key/value store with per-key TTL.
///
/// A `ttl` of `Duration::ZERO` stores the key without expiry. Implementations
/// only guarantee per-key consistency.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Fetch the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Whether `key` currently holds a live value
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove `key`; returns whether a live value was removed.
    ///
    /// Only one of several concurrent deletes of the same key returns `true`.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every key matching the glob `pattern` (`*` and `?`);
    /// returns the number of keys removed
    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Atomically replace the value under `key` with `new` if and only if it
    /// currently equals `expected`. Returns `false` when the key is missing or
    /// holds something else.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        new: &[u8],
        ttl: Duration,
    ) -> Result<bool, CacheError>;
}
