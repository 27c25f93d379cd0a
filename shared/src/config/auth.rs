//! Access and refresh token configuration

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_SECRET: &str = "sessionguard-dev-secret-change-in-production";
const DEFAULT_ENCRYPT_KEY: &str = "0123456789abcdef0123456789abcdef";

/// Token signing and encryption configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC-SHA256 signing secret
    pub secret: String,

    /// AES-256-GCM key for the identity payload, exactly 32 bytes
    pub encrypt_key: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// `iss` claim written and required on verification
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            encrypt_key: String::from(DEFAULT_ENCRYPT_KEY),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("sessionguard"),
        }
    }
}

impl JwtConfig {
    /// Create a new configuration with the given signing secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            encrypt_key: std::env::var("JWT_ENCRYPT_KEY").unwrap_or(defaults.encrypt_key),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_or(
                "JWT_REFRESH_TOKEN_EXPIRY",
                defaults.refresh_token_expiry,
            ),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET || self.encrypt_key == DEFAULT_ENCRYPT_KEY
    }

    /// Reject key material or lifetimes the token issuer cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }
        if self.encrypt_key.len() != 32 {
            return Err(format!(
                "JWT_ENCRYPT_KEY must be exactly 32 bytes, got {}",
                self.encrypt_key.len()
            ));
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err("token expiry values must be positive".to_string());
        }
        Ok(())
    }
}
