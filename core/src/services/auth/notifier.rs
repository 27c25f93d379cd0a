use async_trait::async_trait;

use crate::errors::DomainError;

/// Delivers password reset tokens to account owners
#[async_trait]
pub trait PasswordResetNotifier: Send + Sync {
    async fn send_reset_token(&self, email: &str, token: &str) -> Result<(), DomainError>;
}
