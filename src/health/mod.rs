//! Liveness and readiness endpoints.
//!
//! - `/health` reports that the process is serving requests
//! - `/health/ready` additionally pings the database

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::AppState;

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Always `200 up` while the server is running
pub async fn simple_health_check() -> impl IntoResponse {
    debug!("Health check endpoint called");

    (
        StatusCode::OK,
        Json(json!({
            "status": HealthStatus::Up,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// `200 up` when the database answers a ping, `503 down` otherwise
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status_code, status, database) = match crate::db::check_connection(&state.db).await {
        Ok(()) => (StatusCode::OK, HealthStatus::Up, HealthStatus::Up),
        Err(err) => {
            warn!("Readiness check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthStatus::Down,
                HealthStatus::Down,
            )
        }
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "checks": { "database": database },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(simple_health_check))
        .route("/health/ready", get(readiness_check))
}
