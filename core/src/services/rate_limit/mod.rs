//! Per-client token bucket rate limiting
//!
//! - `bucket` - continuous-refill token bucket
//! - `registry` - lazily populated map of buckets keyed by client
//! - `sweeper` - cancellable background task evicting idle entries

mod bucket;
mod registry;
mod sweeper;


pub use bucket::TokenBucket;
pub use registry::RateLimiterRegistry;
pub use sweeper::EvictionSweeper;
