//! Cache doubles for refresh store tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::errors::CacheError;
use crate::services::cache::{CacheService, MemoryCache};

/// Memory cache whose writes can be switched to fail
#[derive(Default)]
pub struct FlakyCache {
    pub inner: MemoryCache,
    pub fail_sets: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for FlakyCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.check_read()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("write timed out"));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.check_read()?;
        self.inner.exists(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.inner.delete(key).await
    }

    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        self.inner.clear_pattern(pattern).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        new: &[u8],
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        self.inner.compare_and_swap(key, expected, new, ttl).await
    }
}
