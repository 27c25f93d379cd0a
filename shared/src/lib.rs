//! Shared configuration and common types for the SessionGuard server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures and error codes
//! - API response wrappers

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, BucketLimits, CacheBackend, CacheConfig, Environment, JwtConfig, LoggingConfig,
    RateLimitConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus};
