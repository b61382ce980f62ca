//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `auth` - Authentication middleware and extractors
//! - `rate_limit` - Fixed-window limits with `X-RateLimit-*` headers

pub mod auth;
pub mod rate_limit;

pub use auth::{
    auth_middleware, bearer_token, AuthRejection, AuthState, OptionalAuth, RequireAdmin,
    RequireAuth,
};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
