//! Short-stay listing and reservation flows through the HTTP router.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;

use common::TestApp;

fn day(offset: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(offset)
}

async fn listing(app: &TestApp, host: &str) -> String {
    let (status, body) = app
        .post(
            "/api/short-stay/listings",
            Some(host),
            json!({
                "title": "Goa beach studio",
                "city": "Goa",
                "address": "Calangute Beach Road",
                "nightly_rate": 3_000,
                "cleaning_fee": 500,
                "max_guests": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "active");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn quote_prices_nights_plus_cleaning() {
    let app = TestApp::new();
    let (_, host) = app.member("host@example.com").await;
    let id = listing(&app, &host).await;

    let (status, quote) = app
        .get(
            &format!(
                "/api/short-stay/listings/{}/quote?check_in={}&check_out={}&guests=2",
                id,
                day(10),
                day(13)
            ),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["nights"], 3);
    assert_eq!(quote["total"], 3 * 3_000 + 500);
}

#[tokio::test]
async fn overlapping_reservation_conflicts_until_cancelled() {
    let app = TestApp::new();
    let (_, host) = app.member("host@example.com").await;
    let (_, guest) = app.member("guest@example.com").await;
    let (_, other) = app.member("other@example.com").await;
    let id = listing(&app, &host).await;

    let (status, first) = app
        .post(
            "/api/short-stay/reservations",
            Some(&guest),
            json!({ "listing_id": id, "check_in": day(10), "check_out": day(13), "guests": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "pending");
    assert!(first["hold_expires_at"].is_string());

    let overlapping = json!({ "listing_id": id, "check_in": day(12), "check_out": day(15) });
    let (status, error) = app
        .post("/api/short-stay/reservations", Some(&other), overlapping.clone())
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DATES_UNAVAILABLE");

    // Checkout day is free for the next arrival.
    let (status, _) = app
        .post(
            "/api/short-stay/reservations",
            Some(&other),
            json!({ "listing_id": id, "check_in": day(13), "check_out": day(14) }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let first_id = first["id"].as_str().unwrap();
    let (status, cancelled) = app
        .post(
            &format!("/api/short-stay/reservations/{}/cancel", first_id),
            Some(&guest),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = app
        .post(
            "/api/short-stay/reservations",
            Some(&other),
            json!({ "listing_id": id, "check_in": day(10), "check_out": day(12) }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn past_check_in_is_rejected() {
    let app = TestApp::new();
    let (_, host) = app.member("host@example.com").await;
    let (_, guest) = app.member("guest@example.com").await;
    let id = listing(&app, &host).await;

    let (status, error) = app
        .post(
            "/api/short-stay/reservations",
            Some(&guest),
            json!({ "listing_id": id, "check_in": day(-2), "check_out": day(1) }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn reservations_require_authentication() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/short-stay/reservations/mine", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
