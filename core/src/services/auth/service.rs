//! Session service: login, refresh, logout, request authentication and
//! password reset

use chrono::Utc;
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::user::{normalize_email, User};
use crate::domain::value_objects::SessionTokens;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::cache::CacheService;
use crate::services::refresh::{fingerprint, RefreshTokenStore};
use crate::services::revocation::RevocationRegistry;
use crate::services::token::TokenIssuer;

use super::config::SessionServiceConfig;
use super::login_guard::LoginAttemptGuard;
use super::notifier::PasswordResetNotifier;
use super::password::{hash_password, verify_password};

/// Cache key prefix for password reset tickets
pub const RESET_KEY_PREFIX: &str = "reset:";

/// Cache key prefix for the per-email reset request cooldown
pub const RESET_COOLDOWN_PREFIX: &str = "reset:ratelimit:";

const RESET_TOKEN_BYTES: usize = 16;

/// Orchestrates the session flows over the token, refresh and revocation
/// components
pub struct SessionService<
    C: CacheService + ?Sized = dyn CacheService,
    U: UserRepository + ?Sized = dyn UserRepository,
> {
    users: Arc<U>,
    cache: Arc<C>,
    issuer: Arc<TokenIssuer>,
    refresh_tokens: RefreshTokenStore<C>,
    revocations: RevocationRegistry<C>,
    login_guard: LoginAttemptGuard,
    notifier: Arc<dyn PasswordResetNotifier>,
    config: SessionServiceConfig,
}

impl<C, U> SessionService<C, U>
where
    C: CacheService + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Create a new session service
    ///
    /// # Arguments
    ///
    /// * `users` - Account lookups and password updates
    /// * `cache` - Store for refresh tokens, the blacklist and reset tickets
    /// * `issuer` - Access token issuer
    /// * `login_guard` - Per-client login attempt limiter
    /// * `notifier` - Delivery of password reset tokens
    /// * `config` - Service configuration
    pub fn new(
        users: Arc<U>,
        cache: Arc<C>,
        issuer: Arc<TokenIssuer>,
        login_guard: LoginAttemptGuard,
        notifier: Arc<dyn PasswordResetNotifier>,
        config: SessionServiceConfig,
    ) -> Self {
        Self {
            refresh_tokens: RefreshTokenStore::new(cache.clone(), config.refresh.clone()),
            revocations: RevocationRegistry::new(cache.clone()),
            users,
            cache,
            issuer,
            login_guard,
            notifier,
            config,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn refresh_tokens(&self) -> &RefreshTokenStore<C> {
        &self.refresh_tokens
    }

    pub fn revocations(&self) -> &RevocationRegistry<C> {
        &self.revocations
    }

    pub fn login_guard(&self) -> &LoginAttemptGuard {
        &self.login_guard
    }

    /// Authenticate with email and password.
    ///
    /// The attempt is charged to `client_key` before credentials are checked.
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(
        &self,
        client_key: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<SessionTokens> {
        self.login_guard.check(client_key)?;

        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!(client = client_key, "Login failed: unknown email");
            return Err(DomainError::Unauthorized);
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::info!(
                client = client_key,
                user_id = %user.id,
                "Login failed: wrong password"
            );
            return Err(DomainError::Unauthorized);
        }

        self.login_guard.reset(client_key);
        let tokens = self.issue_session(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(tokens)
    }

    /// Exchange a refresh token for a new token pair. The presented token
    /// is consumed.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<SessionTokens> {
        let rotation = self.refresh_tokens.rotate(refresh_token).await.map_err(|e| {
            tracing::info!(
                token = %fingerprint(refresh_token),
                reason = %e,
                "Refresh rejected"
            );
            e
        })?;

        let Some(user) = self.users.find_by_id(rotation.subject_id).await? else {
            tracing::warn!(
                user_id = %rotation.subject_id,
                "Refresh token belongs to a missing user"
            );
            self.refresh_tokens.revoke(&rotation.token).await?;
            return Err(DomainError::Unauthorized);
        };

        let access_token = self.issuer.generate_access_token(&Identity::from(&user))?;
        Ok(SessionTokens::new(
            access_token,
            rotation.token,
            self.issuer.access_ttl().num_seconds(),
        ))
    }

    /// Revoke the presented access token for the rest of its lifetime and
    /// the refresh token, if given.
    ///
    /// A refresh token issued to another subject is refused before anything
    /// is revoked.
    pub async fn logout(&self, access_token: &str, refresh_token: Option<&str>) -> DomainResult<()> {
        let claims = self.issuer.parse_and_verify(access_token)?;

        if let Some(refresh_token) = refresh_token {
            let identity = self.issuer.decrypt_payload(&claims)?;
            self.refresh_tokens
                .revoke_owned(refresh_token, identity.subject_id)
                .await?;
        }

        self.revocations
            .blacklist(&claims.jti, claims.remaining_lifetime(Utc::now()))
            .await?;

        tracing::info!(jti = %claims.jti, "Session logged out");
        Ok(())
    }

    /// Resolve a bearer token to the identity it carries.
    ///
    /// A blacklist lookup that fails denies the request.
    pub async fn authenticate_request(&self, bearer: &str) -> DomainResult<Identity> {
        let claims = self.issuer.parse_and_verify(bearer).map_err(|e| {
            tracing::debug!(reason = %e, "Access token rejected");
            e
        })?;

        match self.revocations.is_blacklisted(&claims.jti).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::debug!(jti = %claims.jti, "Access token is blacklisted");
                return Err(DomainError::Unauthorized);
            }
            Err(e) => {
                tracing::error!(jti = %claims.jti, error = %e, "Blacklist lookup failed, denying");
                return Err(e.into());
            }
        }

        Ok(self.issuer.decrypt_payload(&claims)?)
    }

    /// Start a password reset for `email`.
    ///
    /// Succeeds silently for unknown addresses. A second request for the same
    /// address within the cooldown is rejected either way.
    pub async fn request_password_reset(&self, email: &str) -> DomainResult<()> {
        let email = normalize_email(email);
        let cooldown_key = format!("{}{}", RESET_COOLDOWN_PREFIX, email);

        if self.cache.exists(&cooldown_key).await? {
            return Err(DomainError::too_many_requests(to_std(self.config.reset_cooldown)));
        }
        self.cache
            .set(&cooldown_key, b"1", to_std(self.config.reset_cooldown))
            .await?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_reset_token();
        let subject = serde_json::to_vec(&user.id)
            .map_err(|e| DomainError::internal(format!("reset ticket encoding failed: {}", e)))?;
        self.cache
            .set(
                &format!("{}{}", RESET_KEY_PREFIX, token),
                &subject,
                to_std(self.config.reset_token_ttl),
            )
            .await?;

        self.notifier.send_reset_token(&user.email, &token).await?;
        tracing::info!(user_id = %user.id, "Password reset ticket issued");
        Ok(())
    }

    /// Set a new password using a reset ticket. Each ticket works once.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> DomainResult<()> {
        if new_password.chars().count() < self.config.min_password_length {
            return Err(DomainError::validation(format!(
                "password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        let key = format!("{}{}", RESET_KEY_PREFIX, token);
        let raw = self
            .cache
            .get(&key)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        // concurrent resets race on the delete; only the winner proceeds
        if !self.cache.delete(&key).await? {
            return Err(DomainError::Unauthorized);
        }

        let subject_id: Uuid = serde_json::from_slice(&raw)
            .map_err(|e| DomainError::internal(format!("reset ticket is unreadable: {}", e)))?;

        let hash = hash_password(new_password, self.config.bcrypt_cost).await?;
        self.users.update_password(subject_id, &hash).await?;

        tracing::info!(user_id = %subject_id, "Password reset completed");
        Ok(())
    }

    async fn issue_session(&self, user: &User) -> DomainResult<SessionTokens> {
        let access_token = self.issuer.generate_access_token(&Identity::from(user))?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;

        Ok(SessionTokens::new(
            access_token,
            refresh_token,
            self.issuer.access_ttl().num_seconds(),
        ))
    }
}

fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn to_std(ttl: chrono::Duration) -> std::time::Duration {
    ttl.to_std()
        .unwrap_or_default()
        .max(std::time::Duration::from_millis(1))
}
