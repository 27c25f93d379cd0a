//! Component-level error types
//!
//! Each subsystem reports failures through its own enum so callers can log the
//! precise reason. [`super::DomainError`] folds them into the client-facing
//! taxonomy.

use thiserror::Error;

/// Access token issuance and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Payload decryption failed: {reason}")]
    Decryption { reason: String },

    #[error("Token signing failed: {reason}")]
    Signing { reason: String },
}

/// Refresh token lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Refresh token not found")]
    NotFound,

    #[error("Refresh token revoked")]
    Revoked,

    #[error("Refresh token expired")]
    Expired,

    #[error("Refresh token belongs to another subject")]
    NotOwned,

    /// The old token was revoked but a replacement could not be issued
    #[error("Refresh token rotation aborted: {reason}")]
    RotationAborted { reason: String },

    #[error("Stored refresh token record is unreadable: {reason}")]
    Corrupt { reason: String },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Cache collaborator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backend could not be reached or did not answer in time
    #[error("Cache unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Cache operation failed: {reason}")]
    Operation { reason: String },
}

impl CacheError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        CacheError::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn operation(reason: impl Into<String>) -> Self {
        CacheError::Operation {
            reason: reason.into(),
        }
    }
}
