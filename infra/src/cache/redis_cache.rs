//! Redis implementation of the `CacheService` contract
//!
//! Values are stored as raw bytes. TTLs are written with millisecond
//! precision (`SET .. PX`); a zero TTL stores the key without expiry.
//! Compare-and-swap runs as a Lua script so the read and the write happen
//! atomically on the server.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use sg_core::errors::CacheError;
use sg_core::services::cache::CacheService;

use crate::cache::CacheConfig;
use crate::InfrastructureError;

/// Base delay between connection attempts and read retries
const RETRY_DELAY_MS: u64 = 100;

/// Upper bound for the exponential backoff
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Keys fetched per SCAN round trip in `clear_pattern`
const SCAN_BATCH: usize = 200;

const COMPARE_AND_SWAP_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    local ttl = tonumber(ARGV[3])
    if ttl > 0 then
        redis.call('SET', KEYS[1], ARGV[2], 'PX', ttl)
    else
        redis.call('SET', KEYS[1], ARGV[2])
    end
    return 1
end
return 0
"#;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client
///
/// Cloning is cheap: clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisCache {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Retry budget for idempotent reads
    max_retries: u32,
    compare_and_swap: Script,
}

impl RedisCache {
    /// Connect to the Redis instance named by `config.url`.
    ///
    /// Connection attempts are retried `config.max_retries` times with
    /// exponential backoff before giving up.
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            max_retries = config.max_retries,
            "Creating Redis cache client"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::connect_with_retry(&client, config.max_retries).await?;

        info!("Redis cache client created successfully");

        Ok(Self {
            connection,
            max_retries: config.max_retries,
            compare_and_swap: Script::new(COMPARE_AND_SWAP_SCRIPT),
        })
    }

    async fn connect_with_retry(
        client: &Client,
        max_retries: u32,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = RETRY_DELAY_MS;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    debug!("Connected to Redis on attempt {}", attempts);
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Redis connection failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Run a read-only command, retrying transient failures.
    ///
    /// Writes must not go through here: a retried write cannot tell whether
    /// the first attempt landed.
    async fn read_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = RETRY_DELAY_MS;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis read failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Check that the server answers `PING`
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        let response: String = self
            .read_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async(&mut conn).await })
            })
            .await?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(())
        } else {
            Err(InfrastructureError::Config(format!(
                "unexpected PING response: {}",
                response
            )))
        }
    }

    async fn scan_keys(&self, pattern: &str) -> RedisResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let owned = key.to_string();
        self.read_with_retry(move |mut conn| {
            let key = owned.clone();
            Box::pin(async move { redis::cmd("GET").arg(key).query_async(&mut conn).await })
        })
        .await
        .map_err(|e| map_redis_error("GET", key, e))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        let ttl_ms = ttl_millis(ttl);
        if ttl_ms > 0 {
            cmd.arg("PX").arg(ttl_ms);
        }

        cmd.query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| map_redis_error("SET", key, e))?;
        debug!(key, ttl_ms, "Cached value");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let owned = key.to_string();
        self.read_with_retry(move |mut conn| {
            let key = owned.clone();
            Box::pin(async move { redis::cmd("EXISTS").arg(key).query_async(&mut conn).await })
        })
        .await
        .map_err(|e| map_redis_error("EXISTS", key, e))
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection.clone();
        let removed: u64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("DEL", key, e))?;
        Ok(removed > 0)
    }

    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let keys = self
            .scan_keys(pattern)
            .await
            .map_err(|e| map_redis_error("SCAN", pattern, e))?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let removed: u64 = redis::cmd("DEL")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("DEL", pattern, e))?;

        info!(pattern, removed, "Cleared cache keys by pattern");
        Ok(removed)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        new: &[u8],
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        let mut conn = self.connection.clone();
        let swapped: i64 = self
            .compare_and_swap
            .key(key)
            .arg(expected)
            .arg(new)
            .arg(ttl_millis(ttl))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("CAS", key, e))?;
        Ok(swapped == 1)
    }
}

/// Whole milliseconds for `PX`, rounded up so a sub-millisecond TTL still
/// expires instead of persisting
pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    if ttl.is_zero() {
        return 0;
    }
    let nanos = ttl.as_nanos().div_ceil(1_000_000);
    u64::try_from(nanos).unwrap_or(u64::MAX)
}

/// Connection-level failures surface as `Unavailable` so callers can fail
/// closed; everything else is an `Operation` error.
pub(crate) fn map_redis_error(command: &str, key: &str, error: RedisError) -> CacheError {
    if error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
    {
        error!(command, key, error = %error, "Redis unreachable");
        CacheError::unavailable(format!("{} failed: {}", command, error))
    } else {
        error!(command, key, error = %error, "Redis command failed");
        CacheError::operation(format!("{} failed: {}", command, error))
    }
}

/// Whether a Redis error is transient and the read may be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(proto_end), Some(at_pos)) if at_pos > proto_end => {
            format!("{}****{}", &url[..proto_end + 3], &url[at_pos..])
        }
        _ => url.to_string(),
    }
}
