//! Shared harness for the HTTP integration tests.
//!
//! Builds the full router over the in-memory store with a real JWT service,
//! mock payment and media adapters, and a recording email sender so tests
//! can read one-time passcodes.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use estatehub::adapters::auth::{JwtTokenService, PlainPasswordHasher};
use estatehub::adapters::cloudinary::MockMediaStorage;
use estatehub::adapters::email::RecordingEmailSender;
use estatehub::adapters::http::{api_router, ApiSettings, AppState, Repositories, Services};
use estatehub::adapters::memory::InMemoryStore;
use estatehub::adapters::rate_limiter::InMemoryRateLimiter;
use estatehub::adapters::razorpay::MockPaymentGateway;
use estatehub::application::Notifier;
use estatehub::config::ServerConfig;
use estatehub::domain::foundation::UserRole;
use estatehub::domain::notification::Branding;
use estatehub::domain::user::{Registration, User};
use estatehub::ports::{TokenIssuer, UserRepository};

pub const PASSWORD: &str = "flat2024";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub tokens: Arc<JwtTokenService>,
    pub emails: Arc<RecordingEmailSender>,
}

impl TestApp {
    pub fn new() -> Self {
        let tokens = Arc::new(JwtTokenService::new(
            &SecretString::new("integration-secret".to_string()),
            "estatehub",
            1,
        ));
        let emails = Arc::new(RecordingEmailSender::new());
        let services = Services {
            sessions: tokens.clone(),
            tokens: tokens.clone(),
            hasher: Arc::new(PlainPasswordHasher),
            gateway: Arc::new(MockPaymentGateway::new()),
            storage: Arc::new(MockMediaStorage::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::with_defaults()),
            notifier: Notifier::new(emails.clone(), Branding::default()),
        };
        let state = AppState::new(
            Repositories::in_memory(InMemoryStore::new()),
            services,
            ApiSettings::default(),
        );
        let router = api_router(state.clone(), &ServerConfig::default());
        Self {
            router,
            state,
            tokens,
            emails,
        }
    }

    /// Stores a verified account with `role` and returns a bearer token for it.
    pub async fn user_with_role(&self, email: &str, role: UserRole) -> (User, String) {
        let registration = Registration::new("Test Person", email, None, PASSWORD).unwrap();
        let mut user = User::register(&registration, format!("plain:{}", PASSWORD));
        user.mark_verified();
        user.set_role(role);
        self.state.repos.users.create(&user).await.unwrap();
        let token = self.tokens.issue(&user).unwrap().token;
        (user, token)
    }

    pub async fn member(&self, email: &str) -> (User, String) {
        self.user_with_role(email, UserRole::User).await
    }

    pub async fn admin(&self) -> (User, String) {
        self.user_with_role("admin@estatehub.test", UserRole::Admin).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// Most recent passcode mailed to `email`; the subject starts with the code.
    pub async fn latest_code_for(&self, email: &str) -> String {
        settle().await;
        self.emails
            .sent()
            .iter()
            .rev()
            .find(|m| m.to == email)
            .and_then(|m| m.subject.split_whitespace().next().map(str::to_string))
            .expect("a passcode email was sent")
    }
}

/// Lets emails dispatched on background tasks land.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
