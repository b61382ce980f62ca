//! Listing, moderation and live-group flows through the HTTP router.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::TestApp;

fn listing() -> Value {
    json!({
        "title": "3BHK with lake view",
        "description": "Corner flat on the 9th floor",
        "property_type": "apartment",
        "listing_type": "sale",
        "price": 9_500_000,
        "area_sqft": 1_450,
        "bedrooms": 3,
        "bathrooms": 2,
        "furnishing": "semi_furnished",
        "city": "Pune",
        "locality": "Baner",
        "address": "14 Lake Road, Baner, Pune",
        "amenities": ["Lift", "Gym"],
        "images": []
    })
}

#[tokio::test]
async fn new_listing_is_searchable_only_after_approval() {
    let app = TestApp::new();
    let (_, owner) = app.member("owner@example.com").await;
    let (_, admin) = app.admin().await;

    let (status, created) = app.post("/api/properties", Some(&owner), listing()).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, page) = app.get("/api/properties?city=Pune", None).await;
    assert_eq!(page["total"], 0);

    let (status, _) = app
        .post(
            &format!("/api/admin/properties/{}/moderate", id),
            Some(&owner),
            json!({ "action": "approve" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &format!("/api/admin/properties/{}/moderate", id),
            Some(&admin),
            json!({ "action": "approve" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, page) = app.get("/api/properties?city=pune&min_bedrooms=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], id.as_str());

    let (_, page) = app.get("/api/properties?city=Mumbai", None).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn invalid_listing_reports_the_field() {
    let app = TestApp::new();
    let (_, owner) = app.member("owner@example.com").await;
    let mut body = listing();
    body["price"] = json!(-5);

    let (status, error) = app.post("/api/properties", Some(&owner), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_FAILED");
}

/// Creates a live project with two units and returns (project id, unit ids).
async fn live_project(app: &TestApp, admin: &str) -> (String, Vec<String>) {
    let (status, project) = app
        .post(
            "/api/live-grouping/admin/projects",
            Some(admin),
            json!({
                "name": "Skyline Residency",
                "developer": "Acme Builders",
                "city": "Pune",
                "address": "Survey 42, Hinjewadi Phase 2",
                "group_target": 10,
                "group_discount_pct": 5,
                "token_amount": 100_000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = project["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/live-grouping/admin/projects/{}/hierarchy", id),
            Some(admin),
            Some(json!({
                "expected_version": project["version"],
                "towers": [{
                    "name": "Tower A",
                    "total_floors": 12,
                    "units": [
                        { "unit_number": "A-101", "floor": 1, "unit_type": "2BHK",
                          "carpet_area_sqft": 850, "price": 6_000_000 },
                        { "unit_number": "A-102", "floor": 1, "unit_type": "3BHK",
                          "carpet_area_sqft": 1_150, "price": 8_000_000 }
                    ]
                }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            &format!("/api/live-grouping/admin/projects/{}/status", id),
            Some(admin),
            json!({ "status": "live" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, detail) = app.get(&format!("/api/live-grouping/projects/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let units = detail["towers"][0]["units"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap().to_string())
        .collect();
    (id, units)
}

#[tokio::test]
async fn unit_lock_excludes_other_buyers_until_booked() {
    let app = TestApp::new();
    let (_, admin) = app.admin().await;
    let (_, asha) = app.member("asha@example.com").await;
    let (_, vikram) = app.member("vikram@example.com").await;
    let (project_id, units) = live_project(&app, &admin).await;
    let unit = &units[0];

    let (status, locked) = app
        .post(&format!("/api/live-grouping/units/{}/lock", unit), Some(&asha), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(locked["status"], "locked");
    assert!(locked["lock_expires_at"].is_string());

    let (status, error) = app
        .post(&format!("/api/live-grouping/units/{}/lock", unit), Some(&vikram), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "UNIT_UNAVAILABLE");

    let (status, _) = app
        .post(&format!("/api/live-grouping/units/{}/book", unit), Some(&vikram), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(&format!("/api/live-grouping/units/{}/book", unit), Some(&asha), json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, detail) = app
        .get(&format!("/api/live-grouping/projects/{}", project_id), Some(&asha))
        .await;
    assert_eq!(detail["towers"][0]["units"][0]["status"], "booked");
    assert_eq!(detail["progress"]["booked_units"], 1);

    let (status, mine) = app.get("/api/live-grouping/me", Some(&asha)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["bookings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn stale_hierarchy_version_is_rejected() {
    let app = TestApp::new();
    let (_, admin) = app.admin().await;
    let (project_id, _) = live_project(&app, &admin).await;

    let (status, error) = app
        .send(
            Method::PUT,
            &format!("/api/live-grouping/admin/projects/{}/hierarchy", project_id),
            Some(&admin),
            Some(json!({ "expected_version": 0, "towers": [] })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "VERSION_CONFLICT");
}
