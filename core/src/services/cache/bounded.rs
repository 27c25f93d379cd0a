use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::traits::CacheService;
use crate::errors::CacheError;

/// Wraps a cache so that no single round trip outlives `timeout`.
///
/// An elapsed deadline surfaces as `CacheError::Unavailable`; callers treat it
/// like any other cache outage and deny rather than allow.
pub struct BoundedCache {
    inner: Arc<dyn CacheService>,
    timeout: Duration,
}

impl BoundedCache {
    pub fn new(inner: Arc<dyn CacheService>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Cache operation timed out"
                );
                Err(CacheError::unavailable(format!(
                    "{} timed out after {:?}",
                    operation, self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl CacheService for BoundedCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.bounded("set", self.inner.set(key, value, ttl)).await
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        self.bounded("clear_pattern", self.inner.clear_pattern(pattern))
            .await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        new: &[u8],
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        self.bounded(
            "compare_and_swap",
            self.inner.compare_and_swap(key, expected, new, ttl),
        )
        .await
    }
}
