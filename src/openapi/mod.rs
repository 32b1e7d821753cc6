use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::{
        AcknowledgeResponse, HistoricalPerformanceResponse, PurchaseOrderRequest,
        PurchaseOrderResponse, VendorRequest, VendorResponse,
    },
    entities::PurchaseOrderStatus,
    errors::ErrorResponse,
    handlers::{purchase_orders, vendors},
    services::VendorPerformance,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vendor Performance API",
        version = "1.0.0",
        description = r#"
# Vendor Performance API

Tracks vendors and their purchase orders, and derives per-vendor
performance metrics from order history.

## Metrics

- **on_time_delivery_rate**: completed orders delivered by their delivery date
- **quality_rating_avg**: mean quality rating of completed orders
- **average_response_time**: mean seconds from issue to acknowledgment
- **fulfillment_rate**: completed orders over all orders

Metrics are recomputed whenever a purchase order is created, updated,
deleted or acknowledged.

## Error Handling

Failed requests return a JSON body:

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "errors": { "vendor_code": ["vendor with this vendor code already exists."] },
  "timestamp": "2024-01-01T00:00:00+00:00"
}
```
"#
    ),
    paths(
        vendors::list_vendors,
        vendors::create_vendor,
        vendors::get_vendor,
        vendors::update_vendor,
        vendors::delete_vendor,
        vendors::get_vendor_performance,
        vendors::get_vendor_performance_history,
        purchase_orders::list_purchase_orders,
        purchase_orders::create_purchase_order,
        purchase_orders::get_purchase_order,
        purchase_orders::update_purchase_order,
        purchase_orders::delete_purchase_order,
        purchase_orders::acknowledge_purchase_order,
    ),
    components(schemas(
        VendorRequest,
        VendorResponse,
        VendorPerformance,
        HistoricalPerformanceResponse,
        PurchaseOrderRequest,
        PurchaseOrderResponse,
        PurchaseOrderStatus,
        AcknowledgeResponse,
        ErrorResponse,
    )),
    tags(
        (name = "vendors", description = "Vendor management and performance"),
        (name = "purchase-orders", description = "Purchase order management")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/vendors/",
            "/api/vendors/{id}/",
            "/api/vendors/{id}/performance/",
            "/api/vendors/{id}/performance/history/",
            "/api/purchase_orders/",
            "/api/purchase_orders/{id}/",
            "/api/purchase_orders/{id}/acknowledge/",
        ] {
            assert!(doc.paths.paths.contains_key(path), "undocumented: {path}");
        }
    }
}
