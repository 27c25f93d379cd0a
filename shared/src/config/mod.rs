//! Configuration module with business-specific sub-modules
//!
//! - `auth` - access/refresh token key material and lifetimes
//! - `cache` - cache backend selection and Redis connection settings
//! - `environment` - environment detection and logging configuration
//! - `rate_limit` - request throttling and login attempt limits
//! - `server` - HTTP server binding

pub mod auth;
pub mod cache;
pub mod environment;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use auth::JwtConfig;
pub use cache::{CacheBackend, CacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::{BucketLimits, RateLimitConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Token configuration
    pub jwt: JwtConfig,

    /// Cache configuration
    pub cache: CacheConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            jwt: JwtConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present;
    /// variables already set in the environment take precedence.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            jwt: JwtConfig::from_env(),
            cache: CacheConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Check the configuration for values that would prevent startup
    pub fn validate(&self) -> Result<(), String> {
        self.jwt.validate()?;

        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            return Err("JWT_SECRET must be set in production".to_string());
        }

        if self.rate_limit.requests.capacity == 0 || self.rate_limit.login.capacity == 0 {
            return Err("rate limiter capacity must be greater than zero".to_string());
        }

        Ok(())
    }
}

/// Read `key` from the environment and parse it, falling back to `default`
/// when the variable is unset or does not parse.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.jwt.access_token_expiry, 900);
        assert_eq!(config.rate_limit.requests.capacity, 10);
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let config = AppConfig {
            environment: Environment::Production,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("SG_TEST_ENV_OR_GARBAGE", "not-a-number");
        assert_eq!(env_or("SG_TEST_ENV_OR_GARBAGE", 42u32), 42);

        std::env::set_var("SG_TEST_ENV_OR_VALUE", " 7 ");
        assert_eq!(env_or("SG_TEST_ENV_OR_VALUE", 42u32), 7);

        assert_eq!(env_or("SG_TEST_ENV_OR_UNSET", 3i64), 3);
    }
}
