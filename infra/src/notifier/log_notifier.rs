//! Reset notifier that writes to the application log
//!
//! Stands in for an email provider. The token itself is never logged, only
//! its fingerprint, so operators can correlate a delivery with a later reset
//! without being able to use it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use sg_core::errors::DomainError;
use sg_core::services::auth::PasswordResetNotifier;
use sg_core::services::refresh::fingerprint;

/// Logging password reset notifier
#[derive(Clone, Default)]
pub struct LogResetNotifier {
    /// Number of notifications sent
    sent: Arc<AtomicU64>,
}

impl LogResetNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of notifications sent
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PasswordResetNotifier for LogResetNotifier {
    async fn send_reset_token(&self, email: &str, token: &str) -> Result<(), DomainError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        info!(
            to = %mask_email(email),
            token = %fingerprint(token),
            "Password reset token issued"
        );
        Ok(())
    }
}

/// Mask the local part of an email for logging: `alice@example.com` becomes
/// `a****@example.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}****@{}", first, domain),
            None => format!("****@{}", domain),
        },
        None => "*".repeat(email.chars().count()),
    }
}
