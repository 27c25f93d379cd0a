//! Concurrent registry of per-client token buckets

use sg_shared::config::BucketLimits;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

use super::bucket::TokenBucket;

#[derive(Debug)]
struct Entry {
    bucket: TokenBucket,
    last_seen: Instant,
}

impl Entry {
    fn is_idle(&self, now: Instant, threshold: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= threshold
    }
}

/// Token buckets keyed by client, created on first use.
///
/// The map lock is only held to look up or insert an entry; consuming a token
/// locks just that client's entry.
#[derive(Debug)]
pub struct RateLimiterRegistry {
    name: String,
    limits: BucketLimits,
    idle_threshold: Duration,
    entries: RwLock<HashMap<String, Arc<Mutex<Entry>>>>,
}

impl RateLimiterRegistry {
    /// Create a registry.
    ///
    /// The effective idle threshold is never shorter than the time an empty
    /// bucket needs to refill, so evicting an entry cannot hand a client
    /// tokens it would not have had anyway.
    pub fn new(name: impl Into<String>, limits: BucketLimits, idle_threshold: Duration) -> Self {
        let full_refill = if limits.refill_per_sec > 0.0 {
            Duration::from_secs_f64(f64::from(limits.capacity) / limits.refill_per_sec)
        } else {
            Duration::ZERO
        };

        Self {
            name: name.into(),
            limits,
            idle_threshold: idle_threshold.max(full_refill),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Take one token for `key`; `false` means the request must be rejected
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        let entry = self.entry(key, now);
        let mut entry = lock(&entry);
        entry.bucket.try_consume(now)
    }

    /// How long `key` has to wait for its next token. A bucket that never
    /// refills waits out the idle threshold, after which it is evicted.
    pub fn retry_after(&self, key: &str) -> Duration {
        self.retry_after_at(key, Instant::now())
    }

    pub fn retry_after_at(&self, key: &str, now: Instant) -> Duration {
        let entry = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        match entry {
            Some(entry) => lock(&entry)
                .bucket
                .time_until_token(now)
                .unwrap_or(self.idle_threshold),
            None => Duration::ZERO,
        }
    }

    /// Forget `key`; its next request starts from a full bucket
    pub fn reset(&self, key: &str) {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();
        if removed {
            tracing::debug!(registry = %self.name, key, "Reset rate limiter entry");
        }
    }

    /// Evict entries idle for at least the idle threshold
    pub fn sweep_idle(&self) -> usize {
        self.sweep_idle_at(Instant::now())
    }

    /// Two-phase sweep: collect candidates under the read lock, then remove
    /// under the write lock only those still idle.
    pub fn sweep_idle_at(&self, now: Instant) -> usize {
        let candidates: Vec<String> = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            entries
                .iter()
                .filter(|(_, entry)| lock(entry).is_idle(now, self.idle_threshold))
                .map(|(key, _)| key.clone())
                .collect()
        };

        if candidates.is_empty() {
            return 0;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut evicted = 0;
        for key in candidates {
            let still_idle = entries
                .get(&key)
                .is_some_and(|entry| lock(entry).is_idle(now, self.idle_threshold));
            if still_idle {
                entries.remove(&key);
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::debug!(
                registry = %self.name,
                evicted,
                remaining = entries.len(),
                "Evicted idle rate limiter entries"
            );
        }
        evicted
    }

    /// Number of tracked clients
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tokens left for `key` at `now`, full capacity for unknown keys
    pub fn available_at(&self, key: &str, now: Instant) -> f64 {
        let entry = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        match entry {
            Some(entry) => lock(&entry).bucket.available(now),
            None => f64::from(self.limits.capacity),
        }
    }

    /// Entry for `key`, marked as seen at `now` while the map lock is held so
    /// a concurrent sweep cannot evict it between lookup and use
    fn entry(&self, key: &str, now: Instant) -> Arc<Mutex<Entry>> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(key) {
                touch(entry, now);
                return entry.clone();
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // another caller may have inserted between the two locks
        let entry = entries.entry(key.to_string()).or_insert_with(|| {
            Arc::new(Mutex::new(Entry {
                bucket: TokenBucket::new(self.limits, now),
                last_seen: now,
            }))
        });
        touch(entry, now);
        entry.clone()
    }
}

fn touch(entry: &Mutex<Entry>, now: Instant) {
    let mut entry = lock(entry);
    if now > entry.last_seen {
        entry.last_seen = now;
    }
}

fn lock(entry: &Mutex<Entry>) -> MutexGuard<'_, Entry> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}
