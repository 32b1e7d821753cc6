mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, vendor_body, TestApp};
use rstest::rstest;
use serde_json::json;

#[tokio::test]
async fn create_vendor_then_retrieve_it() {
    let app = TestApp::new().await;

    let created = app.create_vendor("VENDOR001").await;
    let id = id_of(&created);
    assert_eq!(created["name"], "Vendor VENDOR001");
    for metric in [
        "on_time_delivery_rate",
        "quality_rating_avg",
        "average_response_time",
        "fulfillment_rate",
    ] {
        assert_eq!(created[metric], json!(0.0), "{metric} starts at zero");
    }

    let (status, fetched) = app
        .json(Method::GET, &format!("/api/vendors/{id}/"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    assert_eq!(app.count("/api/vendors/").await, 1);
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let app = TestApp::new().await;
    let first = id_of(&app.create_vendor("B-CODE").await);
    let second = id_of(&app.create_vendor("A-CODE").await);

    let (_, body) = app.json(Method::GET, "/api/vendors/", None).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn duplicate_vendor_code_is_rejected() {
    let app = TestApp::new().await;
    app.create_vendor("VENDOR001").await;

    let (status, body) = app
        .json(Method::POST, "/api/vendors/", Some(vendor_body("VENDOR001")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["vendor_code"].is_array());
    assert_eq!(app.count("/api/vendors/").await, 1);
}

#[tokio::test]
async fn missing_fields_are_reported_per_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(Method::POST, "/api/vendors/", Some(json!({ "name": "Only a name" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["contact_details", "address", "vendor_code"] {
        assert_eq!(
            body["errors"][field],
            json!(["This field is required."]),
            "{field}"
        );
    }
    assert!(body["errors"].get("name").is_none());
    assert_eq!(app.count("/api/vendors/").await, 0);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(Method::POST, "/api/vendors/", Some(json!({ "name": 42 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[rstest]
#[case(Method::GET, "/api/vendors/999/")]
#[case(Method::DELETE, "/api/vendors/999/")]
#[case(Method::GET, "/api/vendors/999/performance/")]
#[case(Method::GET, "/api/vendors/999/performance/history/")]
#[tokio::test]
async fn unknown_vendor_is_not_found(#[case] method: Method, #[case] uri: &str) {
    let app = TestApp::new().await;

    let (status, body) = app.json(method, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn updating_unknown_vendor_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .json(Method::PUT, "/api/vendors/999/", Some(vendor_body("X")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_details_and_keeps_metrics() {
    let app = TestApp::new().await;
    let created = app.create_vendor("VENDOR004").await;
    let id = id_of(&created);

    let (status, updated) = app
        .json(
            Method::PUT,
            &format!("/api/vendors/{id}/"),
            Some(json!({
                "name": "Updated Vendor D",
                "contact_details": "Updated Contact D",
                "address": "Updated Address D",
                "vendor_code": "VENDOR004",
                "fulfillment_rate": 0.9
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Updated Vendor D");
    assert_eq!(updated["contact_details"], "Updated Contact D");
    assert_eq!(updated["address"], "Updated Address D");
    assert_eq!(updated["vendor_code"], "VENDOR004");
    assert_eq!(updated["fulfillment_rate"], created["fulfillment_rate"]);
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn update_cannot_take_another_vendors_code() {
    let app = TestApp::new().await;
    app.create_vendor("TAKEN").await;
    let id = id_of(&app.create_vendor("MINE").await);

    let (status, body) = app
        .json(
            Method::PUT,
            &format!("/api/vendors/{id}/"),
            Some(vendor_body("TAKEN")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["vendor_code"].is_array());

    let (_, unchanged) = app
        .json(Method::GET, &format!("/api/vendors/{id}/"), None)
        .await;
    assert_eq!(unchanged["vendor_code"], "MINE");
}

#[tokio::test]
async fn delete_removes_vendor() {
    let app = TestApp::new().await;
    app.create_vendor("KEEP").await;
    let id = id_of(&app.create_vendor("DROP").await);

    let response = app
        .request(Method::DELETE, &format!("/api/vendors/{id}/"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(common::response_json(response).await, serde_json::Value::Null);

    assert_eq!(app.count("/api/vendors/").await, 1);
    let (status, _) = app
        .json(Method::GET, &format!("/api/vendors/{id}/"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/vendors/404/", None).await;
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-request-id header");

    let body = common::response_json(response).await;
    assert_eq!(body["request_id"], json!(header));
}

#[tokio::test]
async fn health_endpoints_report_up() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let (status, body) = app.json(Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"], "up");
}
