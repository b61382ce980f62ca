//! Rate limit configuration types.
//!
//! Global and per-IP limits apply to every request. Route classes add a
//! stricter per-IP window for sensitive endpoints.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ports::{RateLimitKey, RateLimitScope};

/// Complete rate limit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Global rate limits (infrastructure protection).
    pub global: WindowLimit,
    /// Per-IP rate limits across all routes.
    pub per_ip: WindowLimit,
    /// Per-IP limits for route classes, keyed by class name.
    pub route_classes: HashMap<String, WindowLimit>,
}

/// Requests allowed per fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLimit {
    pub requests: u32,
    pub window_secs: u32,
}

impl WindowLimit {
    pub const fn new(requests: u32, window_secs: u32) -> Self {
        Self {
            requests,
            window_secs,
        }
    }
}

/// Endpoint groups with their own per-IP limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Login, registration and password reset
    Auth,
    /// Passcode verification and resend
    Otp,
    /// Public lead capture and newsletter
    Leads,
    Uploads,
    /// Order creation, verification and webhooks
    Payments,
}

impl RouteClass {
    pub const ALL: [RouteClass; 5] = [
        RouteClass::Auth,
        RouteClass::Otp,
        RouteClass::Leads,
        RouteClass::Uploads,
        RouteClass::Payments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Auth => "auth",
            RouteClass::Otp => "otp",
            RouteClass::Leads => "leads",
            RouteClass::Uploads => "uploads",
            RouteClass::Payments => "payments",
        }
    }

    /// Classifies a request path. `None` means only the general limits apply.
    pub fn for_path(path: &str) -> Option<RouteClass> {
        const OTP: [&str; 2] = ["/api/auth/verify-email", "/api/auth/resend-otp"];
        const AUTH: [&str; 4] = [
            "/api/auth/login",
            "/api/auth/register",
            "/api/auth/forgot-password",
            "/api/auth/reset-password",
        ];
        if OTP.contains(&path) {
            Some(RouteClass::Otp)
        } else if AUTH.contains(&path) {
            Some(RouteClass::Auth)
        } else if path.starts_with("/api/marketing/leads") || path.starts_with("/api/marketing/newsletter") {
            Some(RouteClass::Leads)
        } else if path.starts_with("/api/uploads") {
            Some(RouteClass::Uploads)
        } else if path.starts_with("/api/subscriptions/orders")
            || path.starts_with("/api/subscriptions/verify")
            || path.starts_with("/api/subscriptions/webhook")
            || (path.starts_with("/api/short-stay/reservations")
                && (path.ends_with("/pay") || path.ends_with("/confirm-payment")))
        {
            Some(RouteClass::Payments)
        } else {
            None
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        let route_classes = [
            (RouteClass::Auth, WindowLimit::new(20, 15 * 60)),
            (RouteClass::Otp, WindowLimit::new(10, 3600)),
            (RouteClass::Leads, WindowLimit::new(10, 3600)),
            (RouteClass::Uploads, WindowLimit::new(60, 3600)),
            (RouteClass::Payments, WindowLimit::new(30, 3600)),
        ]
        .into_iter()
        .map(|(class, limit)| (class.as_str().to_string(), limit))
        .collect();

        Self {
            global: WindowLimit::new(10_000, 60),
            per_ip: WindowLimit::new(300, 60),
            route_classes,
        }
    }
}

impl RateLimitConfig {
    /// Limit and window for a key; unknown route classes fall back to the per-IP limit.
    pub fn limit_for(&self, key: &RateLimitKey) -> WindowLimit {
        match (key.scope, key.resource.as_deref()) {
            (RateLimitScope::Global, _) => self.global,
            (RateLimitScope::Ip, Some(class)) => {
                self.route_classes.get(class).copied().unwrap_or(self.per_ip)
            }
            (RateLimitScope::Ip, None) => self.per_ip,
        }
    }
}
