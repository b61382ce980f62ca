//! Rate limiter adapters.
//!
//! - `InMemoryRateLimiter` - single instance and tests
//! - `RedisRateLimiter` - shared counters across instances

mod config;
mod in_memory;
mod redis;

pub use config::{RateLimitConfig, RouteClass, WindowLimit};
pub use in_memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;
