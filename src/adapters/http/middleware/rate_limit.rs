//! Rate limiting middleware for axum.
//!
//! This module provides middleware that enforces rate limits using the `RateLimiter` port.
//!
//! # Architecture
//!
//! The middleware checks the scopes in order:
//! 1. Global rate limit (infrastructure protection)
//! 2. Per-IP rate limit (all routes)
//! 3. Per-IP route-class limit for sensitive paths (auth, otp, leads, uploads, payments)
//!
//! Rate limit status is returned in standard HTTP headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the window resets
//! - `Retry-After`: Seconds to wait (only on 429 response)
//!
//! Limiter failures are logged and the request is let through.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::rate_limiter::RouteClass;
use crate::ports::{RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

use super::super::error::ErrorResponse;

/// Rate limiter middleware state.
pub type RateLimiterState = Arc<dyn RateLimiter>;

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    /// Maximum requests allowed in the window.
    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    /// Requests remaining in the current window.
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    /// Unix timestamp when the window resets.
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Outcome of one scope check.
enum Check {
    Pass(Option<RateLimitStatus>),
    Reject(Response),
}

async fn check(limiter: &RateLimiterState, key: RateLimitKey) -> Check {
    let scope = key.to_storage_key();
    match limiter.check(key).await {
        Ok(RateLimitResult::Allowed(status)) => Check::Pass(Some(status)),
        Ok(RateLimitResult::Denied(denied)) => {
            tracing::info!(key = %scope, limit = denied.limit, "Rate limit exceeded");
            Check::Reject(rate_limit_response(denied.limit, denied.retry_after_secs))
        }
        Err(e) => {
            tracing::warn!(key = %scope, "Rate limiter unavailable: {}", e);
            Check::Pass(None)
        }
    }
}

/// Rate limiting middleware that checks global, IP and route-class limits.
///
/// Headers on the response describe the most specific limit that was
/// checked (route class > IP > global).
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiterState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(&request, connect_info.as_ref());
    let route_class = RouteClass::for_path(request.uri().path());

    let mut keys = vec![RateLimitKey::global()];
    if let Some(ip) = &client_ip {
        keys.push(RateLimitKey::ip(ip));
        if let Some(class) = route_class {
            keys.push(RateLimitKey::ip_route(ip, class.as_str()));
        }
    }

    let mut reported = None;
    for key in keys {
        match check(&limiter, key).await {
            Check::Reject(response) => return response,
            Check::Pass(Some(status)) => reported = Some(status),
            Check::Pass(None) => {}
        }
    }

    let mut response = next.run(request).await;
    if let Some(status) = reported {
        add_rate_limit_headers(&mut response, &status);
    }
    response
}

/// Extract client IP from request, checking forwarded headers first.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
fn extract_client_ip<B>(
    request: &axum::http::Request<B>,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> Option<String> {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first_ip) = forwarded.split(',').next() {
            let first_ip = first_ip.trim();
            if !first_ip.is_empty() {
                return Some(first_ip.to_string());
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return Some(real_ip.trim().to_string());
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

/// Create a 429 Too Many Requests response.
fn rate_limit_response(limit: u32, retry_after_secs: u32) -> Response {
    let mut body = ErrorResponse::new("RATE_LIMITED", "Too many requests, please try again later");
    body.details
        .insert("retry_after_secs".to_string(), retry_after_secs.to_string());

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32));
    headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));

    response
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(response: &mut Response, status: &RateLimitStatus) {
    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(status.limit));
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from(status.remaining),
    );
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from(status.reset_at.as_unix_secs()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig, WindowLimit};
    use async_trait::async_trait;
    use axum::{body::Body, middleware, routing::post, Router};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::ports::RateLimitError;

    fn app(limiter: Arc<dyn RateLimiter>) -> Router {
        Router::new()
            .route("/api/auth/login", post(|| async { "ok" }))
            .route("/api/properties", post(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
    }

    fn from_ip(path: &str, ip: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("X-Forwarded-For", ip)
            .body(Body::empty())
            .unwrap()
    }

    struct BrokenLimiter;

    #[async_trait]
    impl RateLimiter for BrokenLimiter {
        async fn check(&self, _key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
            Err(RateLimitError::Unavailable("redis down".to_string()))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // IP Extraction Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn extract_ip_from_x_forwarded_for() {
        let request = Request::builder()
            .uri("/test")
            .header("X-Forwarded-For", "1.2.3.4, 5.6.7.8")
            .body(())
            .unwrap();

        assert_eq!(extract_client_ip(&request, None), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_ip_prefers_x_forwarded_for() {
        let request = Request::builder()
            .uri("/test")
            .header("X-Forwarded-For", "1.2.3.4")
            .header("X-Real-IP", "5.6.7.8")
            .body(())
            .unwrap();

        assert_eq!(extract_client_ip(&request, None), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_ip_returns_none_without_headers() {
        let request = Request::builder().uri("/test").body(()).unwrap();
        assert_eq!(extract_client_ip(&request, None), None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn auth_routes_hit_the_stricter_class_limit() {
        let mut config = RateLimitConfig::default();
        config
            .route_classes
            .insert("auth".to_string(), WindowLimit::new(2, 900));
        let app = app(Arc::new(InMemoryRateLimiter::new(config)));

        for _ in 0..2 {
            let response = app.clone().oneshot(from_ip("/api/auth/login", "7.7.7.7")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = app.clone().oneshot(from_ip("/api/auth/login", "7.7.7.7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));

        // Other routes and other clients are unaffected.
        let response = app.clone().oneshot(from_ip("/api/properties", "7.7.7.7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app.oneshot(from_ip("/api/auth/login", "8.8.8.8")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn allowed_responses_carry_limit_headers() {
        let app = app(Arc::new(InMemoryRateLimiter::with_defaults()));

        let response = app.oneshot(from_ip("/api/auth/login", "1.1.1.1")).await.unwrap();

        assert_eq!(response.headers()[&headers::X_RATELIMIT_LIMIT], "20");
        assert_eq!(response.headers()[&headers::X_RATELIMIT_REMAINING], "19");
        assert!(response.headers().contains_key(&headers::X_RATELIMIT_RESET));
    }

    #[tokio::test]
    async fn limiter_failures_fail_open() {
        let app = app(Arc::new(BrokenLimiter));

        let response = app.oneshot(from_ip("/api/auth/login", "1.1.1.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Response Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn rate_limit_response_has_retry_after_header() {
        let response = rate_limit_response(100, 30);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "30");
        assert_eq!(response.headers()[&headers::X_RATELIMIT_REMAINING], "0");
    }

    #[test]
    fn rate_limiter_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RateLimiterState>();
    }
}
