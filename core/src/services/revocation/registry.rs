use chrono::Duration;
use std::sync::Arc;

use crate::errors::CacheError;
use crate::services::cache::CacheService;

/// Cache key prefix for revoked access token ids
pub const BLACKLIST_KEY_PREFIX: &str = "blacklist:";

const REVOKED_MARKER: &[u8] = b"revoked";

/// Self-expiring deny-list of access token identifiers.
///
/// Entries live exactly as long as the token they block could still verify,
/// so the list never grows beyond the set of live revoked tokens.
pub struct RevocationRegistry<C: CacheService + ?Sized = dyn CacheService> {
    cache: Arc<C>,
}

impl<C: CacheService + ?Sized> RevocationRegistry<C> {
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Deny `jti` for `remaining_ttl`, rounded up to the next millisecond.
    /// A non-positive TTL means the token is already dead and is a no-op.
    pub async fn blacklist(&self, jti: &str, remaining_ttl: Duration) -> Result<(), CacheError> {
        let Some(ttl) = ceil_to_millis(remaining_ttl) else {
            tracing::debug!(jti, "Skipped blacklisting an already expired token");
            return Ok(());
        };

        self.cache.set(&blacklist_key(jti), REVOKED_MARKER, ttl).await?;
        tracing::info!(jti, ttl_ms = ttl.as_millis() as u64, "Blacklisted access token");
        Ok(())
    }

    /// Whether `jti` is currently denied. Errors propagate so callers can
    /// fail closed.
    pub async fn is_blacklisted(&self, jti: &str) -> Result<bool, CacheError> {
        self.cache.exists(&blacklist_key(jti)).await
    }
}

fn blacklist_key(jti: &str) -> String {
    format!("{}{}", BLACKLIST_KEY_PREFIX, jti)
}

fn ceil_to_millis(ttl: Duration) -> Option<std::time::Duration> {
    let std = ttl.to_std().ok()?;
    if std.is_zero() {
        return None;
    }
    let millis = std.as_nanos().div_ceil(1_000_000);
    Some(std::time::Duration::from_millis(millis as u64))
}
