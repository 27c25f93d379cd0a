use sg_shared::config::BucketLimits;
use std::time::Duration;
use tokio::time::Instant;

/// Token bucket with continuous refill.
///
/// Tokens always stay within `[0, capacity]`.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// A full bucket
    pub fn new(limits: BucketLimits, now: Instant) -> Self {
        let capacity = f64::from(limits.capacity);
        Self {
            capacity,
            refill_per_sec: limits.refill_per_sec.max(0.0),
            tokens: capacity,
            last_refill: now,
        }
    }

    /// Refill for the time elapsed since the last refill, then take one token
    pub fn try_consume(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Tokens currently available, after refilling up to `now`
    pub fn available(&mut self, now: Instant) -> f64 {
        self.refill(now);
        self.tokens
    }

    /// Wait until the next token at `now`; `None` if the bucket never refills
    pub fn time_until_token(&mut self, now: Instant) -> Option<Duration> {
        self.refill(now);
        if self.tokens >= 1.0 {
            return Some(Duration::ZERO);
        }
        if self.refill_per_sec <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64((1.0 - self.tokens) / self.refill_per_sec))
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    fn refill(&mut self, now: Instant) {
        // instants older than the last refill add nothing
        if now <= self.last_refill {
            return;
        }
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }
}
