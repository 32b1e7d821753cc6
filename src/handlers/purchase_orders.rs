use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    dto::{
        AcknowledgeResponse, PurchaseOrderInput, PurchaseOrderListQuery, PurchaseOrderRequest,
        PurchaseOrderResponse,
    },
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;

/// List purchase orders
#[utoipa::path(
    get,
    path = "/api/purchase_orders/",
    params(PurchaseOrderListQuery),
    responses(
        (status = 200, description = "Purchase orders ordered by id", body = [PurchaseOrderResponse])
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(query): Query<PurchaseOrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .services
        .purchase_orders
        .list_purchase_orders(query.vendor)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(
        orders
            .into_iter()
            .map(PurchaseOrderResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Create a new purchase order
#[utoipa::path(
    post,
    path = "/api/purchase_orders/",
    request_body = PurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = PurchaseOrderResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<PurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input: PurchaseOrderInput = validate_input(payload)?;

    let order = state
        .services
        .purchase_orders
        .create_purchase_order(input)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {}", order.id);
    Ok(created_response(PurchaseOrderResponse::from(order)))
}

/// Get a purchase order by ID
#[utoipa::path(
    get,
    path = "/api/purchase_orders/{id}/",
    params(("id" = i32, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order found", body = PurchaseOrderResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .get_purchase_order(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PurchaseOrderResponse::from(order)))
}

/// Replace a purchase order's details
#[utoipa::path(
    put,
    path = "/api/purchase_orders/{id}/",
    params(("id" = i32, Path, description = "Purchase order ID")),
    request_body = PurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order updated", body = PurchaseOrderResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<PurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .get_purchase_order(id)
        .await
        .map_err(map_service_error)?;

    let input: PurchaseOrderInput = validate_input(payload)?;

    let order = state
        .services
        .purchase_orders
        .update_purchase_order(id, input)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order updated: {}", id);
    Ok(success_response(PurchaseOrderResponse::from(order)))
}

/// Delete a purchase order
#[utoipa::path(
    delete,
    path = "/api/purchase_orders/{id}/",
    params(("id" = i32, Path, description = "Purchase order ID")),
    responses(
        (status = 204, description = "Purchase order deleted"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .delete_purchase_order(id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order deleted: {}", id);
    Ok(no_content_response())
}

/// Acknowledge a purchase order
#[utoipa::path(
    post,
    path = "/api/purchase_orders/{id}/acknowledge/",
    params(("id" = i32, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order acknowledged", body = AcknowledgeResponse),
        (status = 400, description = "Order date lies in the future", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn acknowledge_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let acknowledgment_date = state
        .services
        .purchase_orders
        .acknowledge_purchase_order(id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order acknowledged: {}", id);
    Ok(success_response(AcknowledgeResponse {
        acknowledgment_date,
    }))
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/purchase_orders/",
            get(list_purchase_orders).post(create_purchase_order),
        )
        .route(
            "/purchase_orders/:id/",
            get(get_purchase_order)
                .put(update_purchase_order)
                .delete(delete_purchase_order),
        )
        .route(
            "/purchase_orders/:id/acknowledge/",
            post(acknowledge_purchase_order),
        )
}
