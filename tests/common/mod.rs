#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use vendor_performance_api::{
    app,
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};

/// Helper harness for spinning up the application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single connection keeps every query on the same in-memory database
        Self::with_database(DbConfig::in_memory_sqlite()).await
    }

    /// Application over a SQLite file inside `dir`, served by a pool of
    /// `max_connections` so requests can really overlap.
    pub async fn with_file_database(dir: &TempDir, max_connections: u32) -> Self {
        let path = dir.path().join("vendors.db");
        Self::with_database(DbConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections,
            min_connections: 1,
            ..Default::default()
        })
        .await
    }

    async fn with_database(db_config: DbConfig) -> Self {
        let cfg = AppConfig::new(
            db_config.url.clone(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app(state.clone());

        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request and decode the JSON response body (`Value::Null` when empty).
    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn create_vendor(&self, code: &str) -> Value {
        let (status, body) = self
            .json(Method::POST, "/api/vendors/", Some(vendor_body(code)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "vendor create failed: {body}");
        body
    }

    pub async fn create_purchase_order(&self, vendor_id: i64, po_number: &str, status: &str) -> Value {
        let (code, body) = self
            .json(
                Method::POST,
                "/api/purchase_orders/",
                Some(purchase_order_body(vendor_id, po_number, status)),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "purchase order create failed: {body}");
        body
    }

    pub async fn count(&self, uri: &str) -> usize {
        let (status, body) = self.json(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().expect("list endpoint returns an array").len()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    }
}

pub fn vendor_body(code: &str) -> Value {
    json!({
        "name": format!("Vendor {code}"),
        "contact_details": format!("Contact {code}"),
        "address": format!("Address {code}"),
        "vendor_code": code,
    })
}

pub fn purchase_order_body(vendor_id: i64, po_number: &str, status: &str) -> Value {
    json!({
        "vendor": vendor_id,
        "po_number": po_number,
        "order_date": "2023-01-01",
        "delivery_date": "2023-01-10",
        "items": [],
        "quantity": 10,
        "status": status,
    })
}

pub fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("response carries an integer id")
}
