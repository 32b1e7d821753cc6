use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{parse_datetime, required, required_datetime, validate_datetime, validate_not_blank};
use crate::entities::{purchase_order, PurchaseOrderStatus};
use crate::errors::ServiceError;

/// Body of purchase order create and update requests.
///
/// `vendor` is required on create; on update it, `items`, `quality_rating`
/// and `issue_date` keep their stored values when omitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct PurchaseOrderRequest {
    /// Id of the owning vendor
    #[schema(example = 1)]
    pub vendor: Option<i32>,

    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 100, message = "Ensure this field has between 1 and 100 characters."),
        custom = "validate_not_blank"
    )]
    #[schema(example = "PO001")]
    pub po_number: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom = "validate_datetime"
    )]
    #[schema(example = "2023-01-01")]
    pub order_date: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom = "validate_datetime"
    )]
    #[schema(example = "2023-01-10")]
    pub delivery_date: Option<String>,

    /// Line items; must be a JSON array
    #[validate(custom = "validate_items")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub items: Option<Value>,

    #[validate(
        required(message = "This field is required."),
        range(min = 0, message = "Ensure this value is greater than or equal to 0.")
    )]
    #[schema(example = 10)]
    pub quantity: Option<i32>,

    #[validate(
        required(message = "This field is required."),
        custom = "validate_status"
    )]
    #[schema(example = "pending")]
    pub status: Option<String>,

    /// Explicit null clears a stored rating on update
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(
        min = 0.0,
        max = 5.0,
        message = "Ensure this value is between 0 and 5."
    ))]
    #[schema(value_type = Option<f64>)]
    pub quality_rating: Option<Option<f64>>,

    #[validate(custom = "validate_datetime")]
    pub issue_date: Option<String>,
}

fn validate_items(items: &Value) -> Result<(), ValidationError> {
    if items.is_array() {
        Ok(())
    } else {
        let mut err = ValidationError::new("not_a_list");
        err.message = Some("Expected a list of items.".into());
        Err(err)
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    PurchaseOrderStatus::from_str(status)
        .map(|_| ())
        .map_err(|_| {
            let mut err = ValidationError::new("invalid_choice");
            err.message = Some(format!("\"{}\" is not a valid choice.", status).into());
            err
        })
}

/// Validated purchase order attributes
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderInput {
    pub vendor_id: Option<i32>,
    pub po_number: String,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub items: Option<Value>,
    pub quantity: i32,
    pub status: PurchaseOrderStatus,
    /// `None` keeps the stored rating, `Some(None)` clears it
    pub quality_rating: Option<Option<f64>>,
    pub issue_date: Option<DateTime<Utc>>,
}

impl TryFrom<PurchaseOrderRequest> for PurchaseOrderInput {
    type Error = ServiceError;

    fn try_from(request: PurchaseOrderRequest) -> Result<Self, Self::Error> {
        request.validate()?;

        let status = required("status", request.status)?;
        let status = PurchaseOrderStatus::from_str(&status).map_err(|_| {
            ServiceError::invalid_field("status", format!("\"{}\" is not a valid choice.", status))
        })?;

        let issue_date = match request.issue_date {
            Some(raw) => Some(parse_datetime(&raw).ok_or_else(|| {
                ServiceError::invalid_field("issue_date", super::DATE_FORMAT_MESSAGE)
            })?),
            None => None,
        };

        Ok(Self {
            vendor_id: request.vendor,
            po_number: required("po_number", request.po_number)?.trim().to_string(),
            order_date: required_datetime("order_date", request.order_date)?,
            delivery_date: required_datetime("delivery_date", request.delivery_date)?,
            items: request.items,
            quantity: required("quantity", request.quantity)?,
            status,
            quality_rating: request.quality_rating,
            issue_date,
        })
    }
}

/// Query string of the purchase order list endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct PurchaseOrderListQuery {
    /// Only return orders of this vendor
    pub vendor: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderResponse {
    pub id: i32,
    pub vendor: i32,
    pub po_number: String,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    #[schema(value_type = Vec<Object>)]
    pub items: Value,
    pub quantity: i32,
    pub status: PurchaseOrderStatus,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<purchase_order::Model> for PurchaseOrderResponse {
    fn from(model: purchase_order::Model) -> Self {
        Self {
            id: model.id,
            vendor: model.vendor_id,
            po_number: model.po_number,
            order_date: model.order_date,
            delivery_date: model.delivery_date,
            items: model.items,
            quantity: model.quantity,
            status: model.status,
            quality_rating: model.quality_rating,
            issue_date: model.issue_date,
            completed_at: model.completed_at,
            acknowledgment_date: model.acknowledgment_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Result of acknowledging a purchase order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AcknowledgeResponse {
    pub acknowledgment_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use serde_json::json;

    fn request() -> PurchaseOrderRequest {
        serde_json::from_value(json!({
            "vendor": 1,
            "po_number": "PO001",
            "order_date": "2023-01-01",
            "delivery_date": "2023-01-10",
            "items": [{"sku": "A-1", "qty": 2}],
            "quantity": 10,
            "status": "pending"
        }))
        .unwrap()
    }

    #[test]
    fn complete_request_converts() {
        let input = PurchaseOrderInput::try_from(request()).unwrap();
        assert_eq!(input.vendor_id, Some(1));
        assert_eq!(input.status, PurchaseOrderStatus::Pending);
        assert_eq!(input.order_date.to_rfc3339(), "2023-01-01T00:00:00+00:00");
        assert_eq!(input.items, Some(json!([{"sku": "A-1", "qty": 2}])));
        assert_eq!(input.issue_date, None);
    }

    #[rstest]
    #[case("quantity", json!(-1))]
    #[case("status", json!("shipped"))]
    #[case("order_date", json!("01/01/2023"))]
    #[case("delivery_date", json!("soon"))]
    #[case("items", json!({"sku": "A-1"}))]
    #[case("quality_rating", json!(5.5))]
    #[case("po_number", json!(""))]
    fn invalid_field_is_reported(#[case] field: &str, #[case] value: Value) {
        let mut body = serde_json::to_value(request()).unwrap();
        body[field] = value;
        let req: PurchaseOrderRequest = serde_json::from_value(body).unwrap();

        let err = PurchaseOrderInput::try_from(req).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(fields) if fields.contains_key(field));
    }

    #[test]
    fn null_quality_rating_differs_from_absent() {
        let mut body = serde_json::to_value(request()).unwrap();
        assert!(body.get("quality_rating").is_none());
        let absent: PurchaseOrderRequest = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(absent.quality_rating, None);

        body["quality_rating"] = Value::Null;
        let cleared: PurchaseOrderRequest = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(cleared.quality_rating, Some(None));
        let input = PurchaseOrderInput::try_from(cleared).unwrap();
        assert_eq!(input.quality_rating, Some(None));

        body["quality_rating"] = json!(4.0);
        let rated: PurchaseOrderRequest = serde_json::from_value(body).unwrap();
        assert_eq!(rated.quality_rating, Some(Some(4.0)));
    }

    #[test]
    fn missing_required_fields_are_listed() {
        let err = PurchaseOrderInput::try_from(PurchaseOrderRequest::default()).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(fields) => {
            for field in ["po_number", "order_date", "delivery_date", "quantity", "status"] {
                assert!(fields.contains_key(field), "missing {field}");
            }
            assert!(!fields.contains_key("vendor"));
        });
    }

    #[test]
    fn response_exposes_vendor_id_as_vendor() {
        let input = PurchaseOrderInput::try_from(request()).unwrap();
        let now = Utc::now();
        let model = purchase_order::Model {
            id: 3,
            vendor_id: 1,
            po_number: input.po_number,
            order_date: input.order_date,
            delivery_date: input.delivery_date,
            items: json!([]),
            quantity: input.quantity,
            status: input.status,
            quality_rating: None,
            issue_date: now,
            completed_at: None,
            acknowledgment_date: None,
            created_at: now,
            updated_at: now,
        };

        let body = serde_json::to_value(PurchaseOrderResponse::from(model)).unwrap();
        assert_eq!(body["vendor"], json!(1));
        assert_eq!(body["status"], json!("pending"));
        assert!(body["acknowledgment_date"].is_null());
    }
}
