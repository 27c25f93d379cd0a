//! Token entities for access and refresh credentials.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claim set of a signed access token.
///
/// Operational fields stay in plaintext so expiry and revocation can be
/// checked without decrypting `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// JWT ID (UUID v4), the revocation handle
    pub jti: String,

    /// Issued at, seconds since the epoch
    pub iat: i64,

    /// Expiration, seconds since the epoch
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// base64url(nonce || AES-256-GCM ciphertext) of the JSON identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl AccessClaims {
    /// Time left until `exp`, rounded up to the next whole millisecond.
    ///
    /// Zero or negative once the token has expired.
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Duration {
        // exp has whole-second precision and timestamp_millis truncates, so
        // the difference never undershoots the true remaining time.
        Duration::milliseconds(self.exp.saturating_mul(1000) - now.timestamp_millis())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Refresh token record stored in the cache under `refresh_token:<token>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Opaque token value (base64url, 43 chars)
    pub token: String,

    /// User ID this token belongs to
    pub subject_id: Uuid,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked
    pub revoked: bool,
}

impl RefreshTokenRecord {
    pub fn new(token: String, subject_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            token,
            subject_id,
            expires_at,
            revoked: false,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// Copy of this record marked revoked
    pub fn revoked(&self) -> Self {
        Self {
            revoked: true,
            ..self.clone()
        }
    }
}
