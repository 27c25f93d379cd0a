//! Cache-backed refresh token store

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::{CacheError, RefreshTokenError};
use crate::services::cache::CacheService;

/// Cache key prefix for refresh token records
pub const REFRESH_KEY_PREFIX: &str = "refresh_token:";

const TOKEN_BYTES: usize = 32;
const MAX_REVOKE_ATTEMPTS: usize = 3;

/// Configuration for the refresh token store
#[derive(Debug, Clone)]
pub struct RefreshStoreConfig {
    /// Lifetime of a refresh token
    pub ttl: Duration,
}

impl Default for RefreshStoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::days(7),
        }
    }
}

impl From<&sg_shared::config::JwtConfig> for RefreshStoreConfig {
    fn from(config: &sg_shared::config::JwtConfig) -> Self {
        Self {
            ttl: Duration::seconds(config.refresh_token_expiry),
        }
    }
}

/// Outcome of a successful rotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    /// Owner of the old (and new) token
    pub subject_id: Uuid,
    /// Replacement refresh token
    pub token: String,
}

/// Short SHA-256 fingerprint of a token, safe to log
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}

/// Issues, validates, rotates and revokes refresh tokens
pub struct RefreshTokenStore<C: CacheService + ?Sized = dyn CacheService> {
    cache: Arc<C>,
    config: RefreshStoreConfig,
}

impl<C: CacheService + ?Sized> RefreshTokenStore<C> {
    pub fn new(cache: Arc<C>, config: RefreshStoreConfig) -> Self {
        Self { cache, config }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Generates and persists a new refresh token for `subject_id`
    pub async fn issue(&self, subject_id: Uuid) -> Result<String, RefreshTokenError> {
        let token = generate_token();
        let record = RefreshTokenRecord::new(token.clone(), subject_id, Utc::now() + self.config.ttl);

        self.cache
            .set(&cache_key(&token), &encode_record(&record)?, to_std(self.config.ttl))
            .await?;

        tracing::debug!(
            subject_id = %subject_id,
            token = %fingerprint(&token),
            "Issued refresh token"
        );
        Ok(token)
    }

    /// Returns the live record for `token`
    pub async fn validate(&self, token: &str) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let (_, record) = self.load(token).await?;
        check_usable(&record)?;
        Ok(record)
    }

    /// Revokes `old` and issues a replacement for the same subject.
    ///
    /// The revoke is a compare-and-swap on the stored record, so of several
    /// concurrent rotations of one token exactly one succeeds. If issuing the
    /// replacement fails afterwards the old token stays revoked and the
    /// caller gets `RotationAborted`.
    pub async fn rotate(&self, old: &str) -> Result<Rotation, RefreshTokenError> {
        let (raw, record) = self.load(old).await?;
        check_usable(&record)?;

        let remaining = record.time_until_expiration(Utc::now());
        let revoked = encode_record(&record.revoked())?;
        let swapped = self
            .cache
            .compare_and_swap(&cache_key(old), &raw, &revoked, to_std(remaining))
            .await?;

        if !swapped {
            tracing::info!(
                token = %fingerprint(old),
                "Refresh token rotation lost race, token already consumed"
            );
            return Err(RefreshTokenError::Revoked);
        }

        match self.issue(record.subject_id).await {
            Ok(token) => {
                tracing::info!(
                    subject_id = %record.subject_id,
                    old = %fingerprint(old),
                    new = %fingerprint(&token),
                    "Rotated refresh token"
                );
                Ok(Rotation {
                    subject_id: record.subject_id,
                    token,
                })
            }
            Err(e) => {
                tracing::warn!(
                    subject_id = %record.subject_id,
                    token = %fingerprint(old),
                    error = %e,
                    "Refresh token revoked but replacement could not be issued"
                );
                Err(RefreshTokenError::RotationAborted {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Marks `token` revoked. Unknown or already revoked tokens are a no-op.
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        self.revoke_checked(token, None).await
    }

    /// Like `revoke`, but a live token issued to a subject other than
    /// `subject_id` is left alone and reported as `NotOwned`
    pub async fn revoke_owned(&self, token: &str, subject_id: Uuid) -> Result<(), RefreshTokenError> {
        self.revoke_checked(token, Some(subject_id)).await
    }

    async fn revoke_checked(&self, token: &str, owner: Option<Uuid>) -> Result<(), RefreshTokenError> {
        let key = cache_key(token);

        for _ in 0..MAX_REVOKE_ATTEMPTS {
            let (raw, record) = match self.load(token).await {
                Ok(loaded) => loaded,
                Err(RefreshTokenError::NotFound) => return Ok(()),
                Err(e) => return Err(e),
            };
            if record.revoked {
                return Ok(());
            }
            if owner.is_some_and(|owner| owner != record.subject_id) {
                tracing::warn!(
                    token = %fingerprint(token),
                    "Refusing to revoke a refresh token owned by another subject"
                );
                return Err(RefreshTokenError::NotOwned);
            }

            let remaining = record.time_until_expiration(Utc::now());
            if remaining <= Duration::zero() {
                self.cache.delete(&key).await?;
                return Ok(());
            }

            let revoked = encode_record(&record.revoked())?;
            if self
                .cache
                .compare_and_swap(&key, &raw, &revoked, to_std(remaining))
                .await?
            {
                tracing::info!(
                    subject_id = %record.subject_id,
                    token = %fingerprint(token),
                    "Revoked refresh token"
                );
                return Ok(());
            }
            // record changed underneath us, re-read and try again
        }

        Err(RefreshTokenError::Cache(CacheError::operation(
            "refresh token kept changing during revoke",
        )))
    }

    async fn load(&self, token: &str) -> Result<(Vec<u8>, RefreshTokenRecord), RefreshTokenError> {
        let raw = self
            .cache
            .get(&cache_key(token))
            .await?
            .ok_or(RefreshTokenError::NotFound)?;

        let record = serde_json::from_slice(&raw).map_err(|e| RefreshTokenError::Corrupt {
            reason: e.to_string(),
        })?;
        Ok((raw, record))
    }
}

fn check_usable(record: &RefreshTokenRecord) -> Result<(), RefreshTokenError> {
    if record.revoked {
        return Err(RefreshTokenError::Revoked);
    }
    if record.is_expired_at(Utc::now()) {
        return Err(RefreshTokenError::Expired);
    }
    Ok(())
}

fn cache_key(token: &str) -> String {
    format!("{}{}", REFRESH_KEY_PREFIX, token)
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn encode_record(record: &RefreshTokenRecord) -> Result<Vec<u8>, RefreshTokenError> {
    serde_json::to_vec(record).map_err(|e| RefreshTokenError::Corrupt {
        reason: e.to_string(),
    })
}

/// Cache TTL for a chrono duration; never zero, which would mean "no expiry"
fn to_std(ttl: Duration) -> std::time::Duration {
    ttl.to_std()
        .unwrap_or_default()
        .max(std::time::Duration::from_millis(1))
}
