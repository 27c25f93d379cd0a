//! Cache configuration module

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use super::env_or;

/// Which `CacheService` implementation the server wires up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis instance
    Redis,
    /// Process-local map, for development and tests
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" | "mem" | "inmemory" => Ok(CacheBackend::Memory),
            other => Err(format!("unknown cache backend: {}", other)),
        }
    }
}

/// Cache connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Backend selection
    pub backend: CacheBackend,

    /// Redis connection URL
    pub url: String,

    /// Upper bound for a single cache round trip, in milliseconds
    pub operation_timeout_ms: u64,

    /// Reconnect attempts before the Redis client gives up at startup
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            url: String::from("redis://localhost:6379"),
            operation_timeout_ms: 3000,
            max_retries: default_max_retries(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: env_or("CACHE_BACKEND", defaults.backend),
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            operation_timeout_ms: env_or("CACHE_OPERATION_TIMEOUT_MS", defaults.operation_timeout_ms),
            max_retries: env_or("REDIS_MAX_RETRIES", defaults.max_retries),
        }
    }

    /// In-process cache, used by tests and local runs without Redis
    pub fn memory() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ..Default::default()
        }
    }

    /// Operation timeout as a `Duration`
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

fn default_max_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("redis".parse::<CacheBackend>().unwrap(), CacheBackend::Redis);
        assert_eq!("Memory".parse::<CacheBackend>().unwrap(), CacheBackend::Memory);
        assert!("memcached".parse::<CacheBackend>().is_err());
    }

    #[test]
    fn test_operation_timeout_default() {
        assert_eq!(CacheConfig::default().operation_timeout(), Duration::from_secs(3));
        assert_eq!(CacheConfig::memory().backend, CacheBackend::Memory);
    }
}
