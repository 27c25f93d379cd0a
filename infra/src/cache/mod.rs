//! Cache module for Redis-backed storage
//!
//! Implements the core `CacheService` contract on top of a multiplexed Redis
//! connection with connection retry and backoff.

pub mod redis_cache;


pub use redis_cache::RedisCache;

// Re-export commonly used types
pub use sg_shared::config::CacheConfig;
