use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    dto::{HistoricalPerformanceResponse, VendorInput, VendorRequest, VendorResponse},
    errors::ApiError,
    services::VendorPerformance,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::info;

/// List all vendors
#[utoipa::path(
    get,
    path = "/api/vendors/",
    responses(
        (status = 200, description = "Vendors ordered by id", body = [VendorResponse])
    ),
    tag = "vendors"
)]
pub async fn list_vendors(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let vendors = state
        .services
        .vendors
        .list_vendors()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(
        vendors
            .into_iter()
            .map(VendorResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Create a new vendor
#[utoipa::path(
    post,
    path = "/api/vendors/",
    request_body = VendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = VendorResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<VendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input: VendorInput = validate_input(payload)?;

    let vendor = state
        .services
        .vendors
        .create_vendor(input)
        .await
        .map_err(map_service_error)?;

    info!("Vendor created: {}", vendor.id);
    Ok(created_response(VendorResponse::from(vendor)))
}

/// Get a vendor by ID
#[utoipa::path(
    get,
    path = "/api/vendors/{id}/",
    params(("id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor found", body = VendorResponse),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .get_vendor(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(VendorResponse::from(vendor)))
}

/// Replace a vendor's details
#[utoipa::path(
    put,
    path = "/api/vendors/{id}/",
    params(("id" = i32, Path, description = "Vendor ID")),
    request_body = VendorRequest,
    responses(
        (status = 200, description = "Vendor updated", body = VendorResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<VendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Unknown ids are a 404 even when the body is invalid
    state
        .services
        .vendors
        .get_vendor(id)
        .await
        .map_err(map_service_error)?;

    let input: VendorInput = validate_input(payload)?;

    let vendor = state
        .services
        .vendors
        .update_vendor(id, input)
        .await
        .map_err(map_service_error)?;

    info!("Vendor updated: {}", id);
    Ok(success_response(VendorResponse::from(vendor)))
}

/// Delete a vendor and its purchase orders
#[utoipa::path(
    delete,
    path = "/api/vendors/{id}/",
    params(("id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .vendors
        .delete_vendor(id)
        .await
        .map_err(map_service_error)?;

    info!("Vendor deleted: {}", id);
    Ok(no_content_response())
}

/// Get a vendor's performance metrics
#[utoipa::path(
    get,
    path = "/api/vendors/{id}/performance/",
    params(("id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Current metrics", body = VendorPerformance),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor_performance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let performance = state
        .services
        .vendors
        .get_performance(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(performance))
}

/// Get the recorded history of a vendor's performance metrics
#[utoipa::path(
    get,
    path = "/api/vendors/{id}/performance/history/",
    params(("id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Metric snapshots, oldest first", body = [HistoricalPerformanceResponse]),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor_performance_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state
        .services
        .vendors
        .get_performance_history(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(
        history
            .into_iter()
            .map(HistoricalPerformanceResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Creates the router for vendor endpoints
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/vendors/", get(list_vendors).post(create_vendor))
        .route(
            "/vendors/:id/",
            get(get_vendor).put(update_vendor).delete(delete_vendor),
        )
        .route("/vendors/:id/performance/", get(get_vendor_performance))
        .route(
            "/vendors/:id/performance/history/",
            get(get_vendor_performance_history),
        )
}
