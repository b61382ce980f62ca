//! In-memory rate limiter for tests and single-instance deployments.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

use super::config::RateLimitConfig;

/// In-memory rate limiter.
///
/// Each window tracks the count of requests and resets when it expires.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    count: u32,
    window_start: u64,
    window_secs: u32,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Drops windows that have already ended.
    pub async fn prune(&self) -> usize {
        let now = Timestamp::now().as_unix_secs();
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, s| now < s.window_start + s.window_secs as u64);
        before - windows.len()
    }

    async fn check_at(&self, key: RateLimitKey, now: u64) -> RateLimitResult {
        let storage_key = key.to_storage_key();
        let limit = self.config.limit_for(&key);

        let mut windows = self.windows.write().await;
        let state = windows.entry(storage_key).or_insert_with(|| WindowState {
            count: 0,
            window_start: now,
            window_secs: limit.window_secs,
        });

        if now >= state.window_start + state.window_secs as u64 {
            state.count = 0;
            state.window_start = now;
        }

        let window_end = state.window_start + state.window_secs as u64;
        if state.count >= limit.requests {
            let retry_after = window_end.saturating_sub(now) as u32;
            return RateLimitResult::Denied(RateLimitDenied {
                limit: limit.requests,
                retry_after_secs: retry_after.max(1),
                scope: key.scope,
                message: format!(
                    "Rate limit exceeded for {}. Retry after {} seconds.",
                    key.scope,
                    retry_after.max(1)
                ),
            });
        }

        state.count += 1;
        RateLimitResult::Allowed(RateLimitStatus {
            limit: limit.requests,
            remaining: limit.requests.saturating_sub(state.count),
            reset_at: Timestamp::from_unix_secs(window_end),
            window_secs: limit.window_secs,
        })
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check_at(key, Timestamp::now().as_unix_secs()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::WindowLimit;

    fn limiter(requests: u32, window_secs: u32) -> InMemoryRateLimiter {
        let mut config = RateLimitConfig::default();
        config.route_classes.insert("otp".to_string(), WindowLimit::new(requests, window_secs));
        InMemoryRateLimiter::new(config)
    }

    #[tokio::test]
    async fn allows_until_limit_then_denies() {
        let limiter = limiter(2, 60);
        let key = || RateLimitKey::ip_route("10.0.0.1", "otp");

        match limiter.check_at(key(), 1_000).await {
            RateLimitResult::Allowed(s) => assert_eq!(s.remaining, 1),
            other => panic!("expected allowed, got {:?}", other),
        }
        assert!(limiter.check_at(key(), 1_001).await.is_allowed());
        match limiter.check_at(key(), 1_010).await {
            RateLimitResult::Denied(d) => {
                assert_eq!(d.limit, 2);
                assert_eq!(d.retry_after_secs, 50);
            }
            other => panic!("expected denied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn window_resets_after_expiry() {
        let limiter = limiter(1, 60);
        let key = || RateLimitKey::ip_route("10.0.0.1", "otp");
        assert!(limiter.check_at(key(), 1_000).await.is_allowed());
        assert!(!limiter.check_at(key(), 1_030).await.is_allowed());
        assert!(limiter.check_at(key(), 1_060).await.is_allowed());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = limiter(1, 60);
        assert!(limiter.check_at(RateLimitKey::ip_route("10.0.0.1", "otp"), 1_000).await.is_allowed());
        assert!(limiter.check_at(RateLimitKey::ip_route("10.0.0.2", "otp"), 1_000).await.is_allowed());
        assert!(limiter.check_at(RateLimitKey::ip("10.0.0.1"), 1_000).await.is_allowed());
    }

    #[tokio::test]
    async fn prune_removes_finished_windows() {
        let limiter = limiter(5, 60);
        limiter.check_at(RateLimitKey::ip_route("10.0.0.1", "otp"), 1_000).await;
        assert_eq!(limiter.prune().await, 1);
    }
}
