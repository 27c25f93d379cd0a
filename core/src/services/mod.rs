//! Business services containing the session and abuse-control logic.

pub mod auth;
pub mod cache;
pub mod rate_limit;
pub mod refresh;
pub mod revocation;
pub mod token;

// Re-export commonly used types
pub use auth::{LoginAttemptGuard, PasswordResetNotifier, SessionService, SessionServiceConfig};
pub use cache::{BoundedCache, CacheService, MemoryCache};
pub use rate_limit::{EvictionSweeper, RateLimiterRegistry, TokenBucket};
pub use refresh::{RefreshStoreConfig, RefreshTokenStore, Rotation};
pub use revocation::RevocationRegistry;
pub use token::{PayloadCipher, TokenIssuer, TokenServiceConfig};
