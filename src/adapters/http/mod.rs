//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter (`dto`, `handlers`, `routes`)
//! and [`api_router`] mounts them under `/api` with the shared middleware
//! stack.
//!
//! # Layer order (outermost first)
//!
//! ```text
//! request id → trace → CORS → compression → body cap → timeout
//!     → rate limit (/api only) → auth → handler
//! ```

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod chat;
pub mod error;
pub mod health;
pub mod live_group;
pub mod marketing;
pub mod middleware;
pub mod properties;
pub mod reviews;
pub mod short_stay;
pub mod state;
pub mod subscriptions;
pub mod uploads;
pub mod wishlists;

use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::handlers::uploads::MAX_FILES_PER_REQUEST;
use crate::config::ServerConfig;

pub use error::{set_verbose_errors, ApiError, ApiJson, ErrorResponse};
pub use state::{ApiSettings, AppState, Repositories, Services};

/// Ceiling for JSON bodies. Upload routes raise their own limit.
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Routes under `/api`, without middleware.
pub fn api_routes(settings: &ApiSettings) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::auth_routes())
        .nest("/properties", properties::property_routes())
        .nest("/bookings", bookings::booking_routes())
        .nest("/subscriptions", subscriptions::subscription_routes())
        .nest("/live-grouping", live_group::live_group_routes())
        .nest("/short-stay", short_stay::short_stay_routes())
        .nest("/wishlists", wishlists::wishlist_routes())
        .nest("/reviews", reviews::review_routes())
        .nest("/chat", chat::chat_routes())
        .nest("/marketing", marketing::marketing_routes())
        .nest("/admin", admin::admin_routes())
        .nest("/uploads", uploads::upload_routes(settings.max_upload_bytes))
}

/// The full application: `/api/*` plus `/health`, with every layer applied.
pub fn api_router(state: AppState, server: &ServerConfig) -> Router {
    let api = api_routes(&state.settings)
        .layer(axum::middleware::from_fn_with_state(
            state.services.sessions.clone(),
            middleware::auth_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.services.rate_limiter.clone(),
            middleware::rate_limit_middleware,
        ));

    let body_cap = state.settings.max_upload_bytes * MAX_FILES_PER_REQUEST + JSON_BODY_LIMIT;
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api", api)
        .nest("/health", health::health_routes())
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                    let request_id = req
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(cors_layer(server))
                .layer(CompressionLayer::new())
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(body_cap))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    server.request_timeout_secs,
                ))),
        )
        .with_state(state)
}

/// Any origin in development when none are configured; otherwise the list.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            middleware::rate_limit::headers::X_RATELIMIT_LIMIT.clone(),
            middleware::rate_limit::headers::X_RATELIMIT_REMAINING.clone(),
            middleware::rate_limit::headers::X_RATELIMIT_RESET.clone(),
        ])
        .max_age(Duration::from_secs(60 * 60));

    if origins.is_empty() && !server.is_production() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}
