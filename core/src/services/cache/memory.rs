//! Process-local `CacheService`.
//!
//! Expiry is checked lazily on access using `tokio::time::Instant`, so paused
//! test runtimes can advance TTLs deterministically. Writes also purge every
//! expired entry once per `PURGE_INTERVAL`, so keys that are never read again
//! do not accumulate.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use super::pattern::glob_match;
use super::traits::CacheService;
use crate::errors::CacheError;

/// Minimum time between full purges of expired entries
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: &[u8], ttl: Duration) -> Self {
        Self {
            value: value.to_vec(),
            expires_at: (!ttl.is_zero()).then(|| Instant::now() + ttl),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// In-memory cache backed by a mutex-guarded map
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    last_purge: Mutex<Option<Instant>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining TTL of `key`, `None` if missing or stored without expiry
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.lock()
            .get(key)
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Number of stored keys, expired ones included
    #[cfg(test)]
    pub(crate) fn stored_len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locked view with the entry for `key` dropped if it has expired
    fn lock_fresh(&self, key: &str) -> MutexGuard<'_, HashMap<String, Entry>> {
        let mut entries = self.lock();
        let now = Instant::now();
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        entries
    }

    /// Drop every expired entry if the last purge is older than `PURGE_INTERVAL`.
    /// Lock order is `entries` then `last_purge`.
    fn purge_if_due(&self, entries: &mut HashMap<String, Entry>, now: Instant) {
        let mut last_purge = self.last_purge.lock().unwrap_or_else(PoisonError::into_inner);
        match *last_purge {
            Some(at) if now.saturating_duration_since(at) < PURGE_INTERVAL => return,
            Some(_) => {}
            None => {
                *last_purge = Some(now);
                return;
            }
        }
        *last_purge = Some(now);

        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, remaining = entries.len(), "Purged expired cache entries");
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.lock_fresh(key).get(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.lock();
        self.purge_if_due(&mut entries, Instant::now());
        entries.insert(key.to_string(), Entry::new(value, ttl));
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.lock_fresh(key).contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.lock_fresh(key).remove(key).is_some())
    }

    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        let mut removed = 0u64;
        entries.retain(|key, entry| {
            if !entry.is_live(now) {
                return false;
            }
            if glob_match(pattern, key) {
                removed += 1;
                return false;
            }
            true
        });
        let expired = (before - entries.len()) as u64 - removed;
        tracing::debug!(pattern, removed, expired, "Cleared cache keys");
        Ok(removed)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        new: &[u8],
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        let mut entries = self.lock_fresh(key);
        self.purge_if_due(&mut entries, Instant::now());
        match entries.get_mut(key) {
            Some(entry) if entry.value == expected => {
                *entry = Entry::new(new, ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
