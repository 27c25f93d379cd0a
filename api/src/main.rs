use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sg_api::app::{configure, AppState};
use sg_api::middleware::RateLimiter;
use sg_core::domain::entities::user::ROLE_ADMIN;
use sg_core::repositories::UserRepository;
use sg_core::services::auth::{
    LoginAttemptGuard, PasswordResetNotifier, SessionService, SessionServiceConfig,
};
use sg_core::services::rate_limit::{EvictionSweeper, RateLimiterRegistry};
use sg_core::services::token::{TokenIssuer, TokenServiceConfig};
use sg_infra::InfrastructureServices;
use sg_shared::config::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting SessionGuard API server");

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;
    if config.jwt.is_using_default_secret() {
        warn!("Using the development JWT key material; set JWT_SECRET and JWT_ENCRYPT_KEY");
    }

    let services = sg_infra::initialize(&config).await?;
    seed_bootstrap_admin(&services, &config).await?;

    let issuer = Arc::new(TokenIssuer::new(TokenServiceConfig::from(&config.jwt))?);

    let limits = &config.rate_limit;
    let login_guard = LoginAttemptGuard::new(limits.login, limits.idle_threshold());
    let request_limiter = Arc::new(RateLimiterRegistry::new(
        "requests",
        limits.requests,
        limits.idle_threshold(),
    ));
    let sweeper = EvictionSweeper::spawn(
        vec![request_limiter.clone(), login_guard.registry()],
        limits.sweep_interval(),
    );

    let users: Arc<dyn UserRepository> = services.users.clone();
    let notifier: Arc<dyn PasswordResetNotifier> = services.notifier.clone();
    let session = SessionService::new(
        users,
        services.cache.clone(),
        issuer,
        login_guard,
        notifier,
        SessionServiceConfig::from(&config.jwt),
    );

    let state = web::Data::new(
        AppState::new(Arc::new(session)).with_trusted_forwarding(limits.trust_forwarded_headers),
    );
    let rate_limiter = RateLimiter::new(request_limiter, limits);

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(rate_limiter.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .shutdown_timeout(config.server.shutdown_timeout);
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server.bind(&bind_address)?.run().await;

    info!("HTTP server stopped, shutting down background tasks");
    sweeper.shutdown().await;

    result.context("HTTP server failed")
}

fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(config.colored)
        .with_target(config.target);
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Compact => registry.with(layer.compact()).try_init()?,
        LogFormat::Full => registry.with(layer).try_init()?,
    }
    Ok(())
}

/// Create the administrator account named by `BOOTSTRAP_ADMIN_EMAIL` and
/// `BOOTSTRAP_ADMIN_PASSWORD`, if both are set
async fn seed_bootstrap_admin(
    services: &InfrastructureServices,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
        std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
    ) else {
        warn!("No bootstrap admin configured; the user store starts empty");
        return Ok(());
    };

    let cost = SessionServiceConfig::from(&config.jwt).bcrypt_cost;
    services
        .users
        .seed_user(&email, &password, ROLE_ADMIN, cost)
        .await
        .context("failed to seed bootstrap admin")?;
    Ok(())
}
