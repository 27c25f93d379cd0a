//! Configuration for the token issuer

use chrono::Duration;
use sg_shared::config::JwtConfig;

/// Key material and lifetimes for access tokens
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC-SHA256 signing secret
    pub jwt_secret: String,
    /// AES-256-GCM key for the `data` claim, must be 32 bytes
    pub encrypt_key: Vec<u8>,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Value written to and required in `iss`
    pub issuer: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            encrypt_key: config.encrypt_key.as_bytes().to_vec(),
            access_token_ttl: Duration::seconds(config.access_token_expiry),
            issuer: config.issuer.clone(),
        }
    }
}
