//! Shared wiring for the HTTP tests

#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sg_api::app::AppState;
use sg_api::middleware::RateLimiter;
use sg_core::domain::entities::user::ROLE_USER;
use sg_core::errors::DomainError;
use sg_core::repositories::UserRepository;
use sg_core::services::auth::{
    LoginAttemptGuard, PasswordResetNotifier, SessionService, SessionServiceConfig,
};
use sg_core::services::cache::{CacheService, MemoryCache};
use sg_core::services::rate_limit::RateLimiterRegistry;
use sg_core::services::token::{TokenIssuer, TokenServiceConfig};
use sg_infra::InMemoryUserRepository;
use sg_shared::config::{BucketLimits, JwtConfig, RateLimitConfig};

pub const EMAIL: &str = "grace@example.com";
pub const PASSWORD: &str = "hopper-1906";

const TEST_COST: u32 = 4;

/// Keeps every reset token it is asked to deliver
#[derive(Default)]
pub struct CapturingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
    pub fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl PasswordResetNotifier for CapturingNotifier {
    async fn send_reset_token(&self, email: &str, token: &str) -> Result<(), DomainError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub limiter: RateLimiter,
    pub notifier: Arc<CapturingNotifier>,
}

/// Request limiter generous enough to stay out of the way
pub fn loose_limits() -> BucketLimits {
    BucketLimits::new(1000, 1000.0)
}

pub async fn setup(request_limits: BucketLimits) -> TestContext {
    setup_with(request_limits, false).await
}

/// Like `setup`, optionally keying clients by forwarded headers
pub async fn setup_with(request_limits: BucketLimits, trust_forwarded_headers: bool) -> TestContext {
    let jwt = JwtConfig::default();

    let users = Arc::new(InMemoryUserRepository::new());
    users
        .seed_user(EMAIL, PASSWORD, ROLE_USER, TEST_COST)
        .await
        .unwrap();
    let users: Arc<dyn UserRepository> = users;

    let cache: Arc<dyn CacheService> = Arc::new(MemoryCache::new());
    let issuer = Arc::new(TokenIssuer::new(TokenServiceConfig::from(&jwt)).unwrap());
    let notifier = Arc::new(CapturingNotifier::default());
    let reset_notifier: Arc<dyn PasswordResetNotifier> = notifier.clone();

    let session = SessionService::new(
        users,
        cache,
        issuer,
        LoginAttemptGuard::with_defaults(),
        reset_notifier,
        SessionServiceConfig {
            bcrypt_cost: TEST_COST,
            ..SessionServiceConfig::from(&jwt)
        },
    );

    let registry = Arc::new(RateLimiterRegistry::new(
        "requests",
        request_limits,
        Duration::from_secs(180),
    ));

    let limits = RateLimitConfig {
        trust_forwarded_headers,
        ..RateLimitConfig::default()
    };

    TestContext {
        state: web::Data::new(
            AppState::new(Arc::new(session)).with_trusted_forwarding(trust_forwarded_headers),
        ),
        limiter: RateLimiter::new(registry, &limits),
        notifier,
    }
}
