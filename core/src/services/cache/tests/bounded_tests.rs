//! Timeout behaviour of the bounded cache wrapper

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::CacheError;
use crate::services::cache::{BoundedCache, CacheService, MemoryCache};

/// Cache whose every call stalls far beyond any reasonable deadline
struct StalledCache;

#[async_trait]
impl CacheService for StalledCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn exists(&self, _key: &str) -> Result<bool, CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(false)
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(false)
    }

    async fn clear_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(0)
    }

    async fn compare_and_swap(
        &self,
        _key: &str,
        _expected: &[u8],
        _new: &[u8],
        _ttl: Duration,
    ) -> Result<bool, CacheError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(true)
    }
}

#[tokio::test(start_paused = true)]
async fn test_stalled_backend_becomes_unavailable() {
    let cache = BoundedCache::new(Arc::new(StalledCache), Duration::from_millis(3000));

    let err = cache.exists("blacklist:x").await.unwrap_err();
    assert!(matches!(err, CacheError::Unavailable { .. }));

    let err = cache
        .compare_and_swap("k", b"a", b"b", Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::Unavailable { .. }));
}

#[tokio::test]
async fn test_fast_backend_passes_through() {
    let cache = BoundedCache::new(Arc::new(MemoryCache::new()), Duration::from_secs(3));

    cache.set("k", b"v", Duration::from_secs(60)).await.unwrap();
    assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));
    assert!(cache.delete("k").await.unwrap());
    assert_eq!(cache.clear_pattern("*").await.unwrap(), 0);
}
