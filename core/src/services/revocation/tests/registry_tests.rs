//! Tests for the revocation registry

use chrono::Duration;
use std::sync::Arc;

use crate::services::cache::MemoryCache;
use crate::services::revocation::RevocationRegistry;

fn create_test_registry() -> (Arc<MemoryCache>, RevocationRegistry<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    (cache.clone(), RevocationRegistry::new(cache))
}

#[tokio::test(start_paused = true)]
async fn test_blacklisted_until_ttl_elapses() {
    let (_, registry) = create_test_registry();
    let ttl = Duration::seconds(30);

    registry.blacklist("jti-1", ttl).await.unwrap();
    assert!(registry.is_blacklisted("jti-1").await.unwrap());

    tokio::time::advance(std::time::Duration::from_millis(29_999)).await;
    assert!(registry.is_blacklisted("jti-1").await.unwrap());

    tokio::time::advance(std::time::Duration::from_millis(1)).await;
    assert!(!registry.is_blacklisted("jti-1").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_ttl_is_rounded_up_to_millisecond() {
    let (cache, registry) = create_test_registry();

    registry
        .blacklist("jti-2", Duration::microseconds(1_500))
        .await
        .unwrap();
    assert_eq!(
        cache.ttl("blacklist:jti-2"),
        Some(std::time::Duration::from_millis(2))
    );
}

#[tokio::test]
async fn test_non_positive_ttl_is_noop() {
    let (cache, registry) = create_test_registry();

    registry.blacklist("zero", Duration::zero()).await.unwrap();
    registry.blacklist("negative", Duration::seconds(-5)).await.unwrap();

    assert!(cache.is_empty());
    assert!(!registry.is_blacklisted("zero").await.unwrap());
}

#[tokio::test]
async fn test_unknown_jti_is_not_blacklisted() {
    let (_, registry) = create_test_registry();
    assert!(!registry.is_blacklisted("never-seen").await.unwrap());
}
