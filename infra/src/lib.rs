//! # Infrastructure Layer
//!
//! Concrete collaborators for the SessionGuard core:
//! - **Cache**: Redis-backed `CacheService` with connection retry
//! - **Repositories**: in-memory `UserRepository` with bootstrap seeding
//! - **Notifier**: password reset delivery through the application log
//!
//! [`initialize`] wires them together from an [`AppConfig`].

use std::sync::Arc;

use sg_core::services::cache::{BoundedCache, CacheService, MemoryCache};
use sg_shared::config::{AppConfig, CacheBackend};

// Re-export core types for convenience
pub use sg_core::errors::*;

/// Cache module - Redis implementation of `CacheService`
pub mod cache;

/// Notifier module - password reset delivery
pub mod notifier;

/// Repositories module - user storage
pub mod repositories;

pub use cache::RedisCache;
pub use notifier::LogResetNotifier;
pub use repositories::InMemoryUserRepository;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Cache shared by the refresh store, the blacklist and reset tickets.
    /// Every round trip is capped by `CacheConfig::operation_timeout`.
    pub cache: Arc<dyn CacheService>,
    /// Account storage
    pub users: Arc<InMemoryUserRepository>,
    /// Reset token delivery
    pub notifier: Arc<LogResetNotifier>,
}

/// Build the infrastructure services selected by `config`.
///
/// Connects to Redis when `CacheBackend::Redis` is configured; the memory
/// backend never fails.
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(backend = ?config.cache.backend, "Initializing infrastructure services");

    let backend: Arc<dyn CacheService> = match config.cache.backend {
        CacheBackend::Redis => {
            let redis = RedisCache::new(config.cache.clone()).await?;
            redis.health_check().await?;
            Arc::new(redis)
        }
        CacheBackend::Memory => {
            tracing::warn!("Using the in-process cache; state is lost on restart and not shared");
            Arc::new(MemoryCache::new())
        }
    };

    let cache: Arc<dyn CacheService> =
        Arc::new(BoundedCache::new(backend, config.cache.operation_timeout()));

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        cache,
        users: Arc::new(InMemoryUserRepository::new()),
        notifier: Arc::new(LogResetNotifier::new()),
    })
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by a core collaborator
    #[error(transparent)]
    Domain(#[from] DomainError),
}
