//! Redis-backed rate limiter for multi-instance deployments.
//!
//! Uses a fixed-window counter algorithm with Redis INCR + EXPIRE.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::Timestamp;
use crate::ports::{RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

use super::config::RateLimitConfig;

/// Redis-backed rate limiter.
///
/// 1. INCR the key to increment the counter
/// 2. If count is 1, set EXPIRE for the window duration
/// 3. If count > limit, deny the request
///
/// Requests can briefly exceed limits at window boundaries.
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    config: RateLimitConfig,
}

impl RedisRateLimiter {
    pub fn new(conn: MultiplexedConnection, config: RateLimitConfig) -> Self {
        Self { conn, config }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str, config: RateLimitConfig) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(url).map_err(|e| RateLimitError::Unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| RateLimitError::Unavailable(e.to_string()))?;
        Ok(Self::new(conn, config))
    }
}

fn unavailable(e: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(e.to_string())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let storage_key = key.to_storage_key();
        let limit = self.config.limit_for(&key);
        let mut conn = self.conn.clone();

        let count: i64 = conn.incr(&storage_key, 1_i64).await.map_err(unavailable)?;
        if count == 1 {
            conn.expire::<_, ()>(&storage_key, limit.window_secs as i64)
                .await
                .map_err(unavailable)?;
        }
        let ttl: i64 = conn.ttl(&storage_key).await.map_err(unavailable)?;

        let reset_secs = if ttl > 0 { ttl as u64 } else { limit.window_secs as u64 };
        let reset_at = Timestamp::from_unix_secs(Timestamp::now().as_unix_secs() + reset_secs);

        if count > limit.requests as i64 {
            let retry_after = (reset_secs as u32).max(1);
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit: limit.requests,
                retry_after_secs: retry_after,
                scope: key.scope,
                message: format!(
                    "Rate limit exceeded for {}. Retry after {} seconds.",
                    key.scope, retry_after
                ),
            }));
        }

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit: limit.requests,
            remaining: limit.requests.saturating_sub(count as u32),
            reset_at,
            window_secs: limit.window_secs,
        }))
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
