//! End-to-end account flows through the HTTP router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_reports_ok_without_auth() {
    let app = TestApp::new();

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn readiness_without_database_is_not_configured() {
    let app = TestApp::new();

    let (status, body) = app.get("/health/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "not_configured");
}

#[tokio::test]
async fn register_verify_then_login() {
    let app = TestApp::new();
    let email = "riya@example.com";

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Riya Kapoor", "email": email, "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], email);

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": email, "password": "secret123" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "EMAIL_NOT_VERIFIED");

    let code = app.latest_code_for(email).await;
    let (status, body) = app
        .post("/api/auth/verify-email", None, json!({ "email": email, "code": code }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": email, "password": "secret123" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email);
}

#[tokio::test]
async fn wrong_verification_code_is_rejected() {
    let app = TestApp::new();
    let email = "kabir@example.com";
    app.post(
        "/api/auth/register",
        None,
        json!({ "name": "Kabir Shah", "email": email, "password": "secret123" }),
    )
    .await;

    let (status, body) = app
        .post("/api/auth/verify-email", None, json!({ "email": email, "code": "000000x" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["code"].is_string());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.member("meera@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "meera@example.com", "password": "not-the-password1" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let app = TestApp::new();
    let (_, member) = app.member("user@example.com").await;
    let (_, admin) = app.admin().await;

    let (status, _) = app.get("/api/admin/stats", Some(&member)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id_and_rate_limit_headers() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = TestApp::new();
    let request = Request::builder()
        .uri("/api/properties")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("x-ratelimit-limit"));
}

#[tokio::test]
async fn oversized_request_body_is_refused_before_the_handler() {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, "4000000000")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
