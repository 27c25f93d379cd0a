//! Configuration for the session service

use chrono::Duration;
use sg_shared::config::JwtConfig;

use crate::services::refresh::RefreshStoreConfig;

/// Configuration for the session service
#[derive(Debug, Clone)]
pub struct SessionServiceConfig {
    /// Refresh token lifetime
    pub refresh: RefreshStoreConfig,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Minimum accepted password length, in characters
    pub min_password_length: usize,
    /// Lifetime of a password reset ticket
    pub reset_token_ttl: Duration,
    /// Minimum gap between two reset requests for the same email
    pub reset_cooldown: Duration,
}

impl Default for SessionServiceConfig {
    fn default() -> Self {
        Self {
            refresh: RefreshStoreConfig::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            min_password_length: 8,
            reset_token_ttl: Duration::hours(1),
            reset_cooldown: Duration::seconds(10),
        }
    }
}

impl From<&JwtConfig> for SessionServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            refresh: RefreshStoreConfig::from(config),
            ..Default::default()
        }
    }
}
