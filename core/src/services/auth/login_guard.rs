//! Brute-force protection for the login endpoint

use sg_shared::config::BucketLimits;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::DomainError;
use crate::services::rate_limit::RateLimiterRegistry;

/// Token bucket per client, separate from general request throttling.
///
/// Every attempt costs a token whether or not the password is right; a
/// successful login resets the client's bucket.
#[derive(Debug, Clone)]
pub struct LoginAttemptGuard {
    registry: Arc<RateLimiterRegistry>,
}

impl LoginAttemptGuard {
    pub fn new(limits: BucketLimits, idle_threshold: Duration) -> Self {
        Self {
            registry: Arc::new(RateLimiterRegistry::new("login", limits, idle_threshold)),
        }
    }

    /// Default limits: 5 attempts, refilled over 5 minutes
    pub fn with_defaults() -> Self {
        Self::new(
            BucketLimits::per_window(5, Duration::from_secs(300)),
            Duration::from_secs(180),
        )
    }

    /// Spend one attempt for `client_key`
    pub fn check(&self, client_key: &str) -> Result<(), DomainError> {
        self.check_at(client_key, Instant::now())
    }

    pub fn check_at(&self, client_key: &str, now: Instant) -> Result<(), DomainError> {
        if self.registry.allow_at(client_key, now) {
            Ok(())
        } else {
            let retry_after = self.registry.retry_after_at(client_key, now);
            tracing::warn!(
                client = client_key,
                retry_after_secs = retry_after.as_secs_f64(),
                "Login attempt limit reached"
            );
            Err(DomainError::too_many_requests(retry_after))
        }
    }

    /// Restore full capacity for `client_key`
    pub fn reset(&self, client_key: &str) {
        self.registry.reset(client_key);
    }

    /// Underlying registry, for the eviction sweeper
    pub fn registry(&self) -> Arc<RateLimiterRegistry> {
        self.registry.clone()
    }
}
