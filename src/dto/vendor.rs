use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{required, validate_not_blank};
use crate::entities::{historical_performance, vendor};
use crate::errors::ServiceError;

/// Body of vendor create and update requests
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct VendorRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 100, message = "Ensure this field has between 1 and 100 characters."),
        custom = "validate_not_blank"
    )]
    #[schema(example = "Acme Supplies")]
    pub name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom = "validate_not_blank"
    )]
    #[schema(example = "orders@acme.example, +1 555 0100")]
    pub contact_details: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom = "validate_not_blank"
    )]
    #[schema(example = "1 Industrial Way, Springfield")]
    pub address: Option<String>,

    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 50, message = "Ensure this field has between 1 and 50 characters."),
        custom = "validate_not_blank"
    )]
    #[schema(example = "VENDOR001")]
    pub vendor_code: Option<String>,
}

/// Validated vendor attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorInput {
    pub name: String,
    pub contact_details: String,
    pub address: String,
    pub vendor_code: String,
}

impl TryFrom<VendorRequest> for VendorInput {
    type Error = ServiceError;

    fn try_from(request: VendorRequest) -> Result<Self, Self::Error> {
        request.validate()?;
        Ok(Self {
            name: required("name", request.name)?.trim().to_string(),
            contact_details: required("contact_details", request.contact_details)?,
            address: required("address", request.address)?,
            vendor_code: required("vendor_code", request.vendor_code)?
                .trim()
                .to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorResponse {
    pub id: i32,
    pub name: String,
    pub contact_details: String,
    pub address: String,
    pub vendor_code: String,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<vendor::Model> for VendorResponse {
    fn from(model: vendor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_details: model.contact_details,
            address: model.address,
            vendor_code: model.vendor_code,
            on_time_delivery_rate: model.on_time_delivery_rate,
            quality_rating_avg: model.quality_rating_avg,
            average_response_time: model.average_response_time,
            fulfillment_rate: model.fulfillment_rate,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// One recorded snapshot of a vendor's metrics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoricalPerformanceResponse {
    pub id: i32,
    pub vendor: i32,
    pub date: DateTime<Utc>,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

impl From<historical_performance::Model> for HistoricalPerformanceResponse {
    fn from(model: historical_performance::Model) -> Self {
        Self {
            id: model.id,
            vendor: model.vendor_id,
            date: model.date,
            on_time_delivery_rate: model.on_time_delivery_rate,
            quality_rating_avg: model.quality_rating_avg,
            average_response_time: model.average_response_time,
            fulfillment_rate: model.fulfillment_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::REQUIRED_MESSAGE;
    use assert_matches::assert_matches;

    fn request() -> VendorRequest {
        VendorRequest {
            name: Some("Vendor A".into()),
            contact_details: Some("Contact A".into()),
            address: Some("Address A".into()),
            vendor_code: Some("VENDOR001".into()),
        }
    }

    #[test]
    fn complete_request_converts() {
        let input = VendorInput::try_from(request()).unwrap();
        assert_eq!(input.name, "Vendor A");
        assert_eq!(input.vendor_code, "VENDOR001");
    }

    #[test]
    fn every_missing_field_is_reported() {
        let err = VendorInput::try_from(VendorRequest::default()).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(fields) => {
            for field in ["name", "contact_details", "address", "vendor_code"] {
                assert_eq!(fields.get(field), Some(&vec![REQUIRED_MESSAGE.to_string()]));
            }
        });
    }

    #[test]
    fn overlong_vendor_code_is_rejected() {
        let mut req = request();
        req.vendor_code = Some("X".repeat(51));
        let err = VendorInput::try_from(req).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(fields) if fields.contains_key("vendor_code"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut req = request();
        req.name = Some("   ".into());
        let err = VendorInput::try_from(req).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(fields) if fields.contains_key("name"));
    }
}
