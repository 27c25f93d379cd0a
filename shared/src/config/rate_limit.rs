//! Rate limiting configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::env_or;

/// Token bucket shape: burst capacity and continuous refill rate
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BucketLimits {
    /// Maximum tokens held (burst size)
    pub capacity: u32,

    /// Tokens restored per second
    pub refill_per_sec: f64,
}

impl BucketLimits {
    pub fn new(capacity: u32, refill_per_sec: f64) -> Self {
        Self {
            capacity,
            refill_per_sec,
        }
    }

    /// `attempts` tokens restored evenly over `window`
    pub fn per_window(attempts: u32, window: Duration) -> Self {
        let secs = window.as_secs_f64();
        let refill_per_sec = if secs > 0.0 { attempts as f64 / secs } else { 0.0 };
        Self::new(attempts, refill_per_sec)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable the request throttling middleware
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Per-client limits applied to every request
    pub requests: BucketLimits,

    /// Per-client limits applied to login attempts
    pub login: BucketLimits,

    /// Seconds between idle-eviction sweeps
    pub sweep_interval_secs: u64,

    /// Seconds without traffic before an entry is evicted
    pub idle_threshold_secs: u64,

    /// Minimum seconds between two rejection log lines for the same client
    pub rejection_log_interval_secs: u64,

    /// Key clients by `X-Forwarded-For` / `X-Real-IP` instead of the peer
    /// address. Only safe behind a proxy that overwrites those headers.
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            requests: BucketLimits::new(10, 5.0),
            login: BucketLimits::per_window(5, Duration::from_secs(300)),
            sweep_interval_secs: 60,
            idle_threshold_secs: 180,
            rejection_log_interval_secs: 20,
            trust_forwarded_headers: false,
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let request_rate = env_or("RATE_LIMITER_REQUEST_SEC", defaults.requests.refill_per_sec);
        let request_burst = env_or("RATE_LIMITER_REQUEST_BURST", defaults.requests.capacity);
        let login_attempts = env_or("LOGIN_MAX_ATTEMPTS", defaults.login.capacity);
        let login_window = env_or("LOGIN_ATTEMPT_WINDOW_SECS", 300u64);

        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", defaults.enabled),
            requests: BucketLimits::new(request_burst, request_rate),
            login: BucketLimits::per_window(login_attempts, Duration::from_secs(login_window)),
            sweep_interval_secs: env_or("RATE_LIMITER_SWEEP_SECS", defaults.sweep_interval_secs),
            idle_threshold_secs: env_or("RATE_LIMITER_IDLE_SECS", defaults.idle_threshold_secs),
            rejection_log_interval_secs: defaults.rejection_log_interval_secs,
            trust_forwarded_headers: env_or("RATE_LIMIT_TRUST_FORWARDED", defaults.trust_forwarded_headers),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }

    pub fn rejection_log_interval(&self) -> Duration {
        Duration::from_secs(self.rejection_log_interval_secs)
    }
}

fn default_enabled() -> bool {
    true
}
