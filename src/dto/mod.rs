//! Request and response bodies for the HTTP API.
//!
//! Request fields are `Option`s so a missing field is reported through the
//! validation error map instead of failing deserialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::errors::ServiceError;

pub mod purchase_order;
pub mod vendor;

pub use purchase_order::{
    AcknowledgeResponse, PurchaseOrderInput, PurchaseOrderListQuery, PurchaseOrderRequest,
    PurchaseOrderResponse,
};
pub use vendor::{HistoricalPerformanceResponse, VendorInput, VendorRequest, VendorResponse};

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required.";
pub(crate) const BLANK_MESSAGE: &str = "This field may not be blank.";
pub(crate) const DATE_FORMAT_MESSAGE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD, RFC 3339.";

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(BLANK_MESSAGE.into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_datetime(value: &str) -> Result<(), ValidationError> {
    if parse_datetime(value).is_none() {
        let mut err = ValidationError::new("date_format");
        err.message = Some(DATE_FORMAT_MESSAGE.into());
        return Err(err);
    }
    Ok(())
}

/// Deserialize a field where an explicit `null` (`Some(None)`) differs from
/// an absent field (`None`, via `#[serde(default)]`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Pull a validated required field out of its `Option`.
pub(crate) fn required<T>(field: &str, value: Option<T>) -> Result<T, ServiceError> {
    value.ok_or_else(|| ServiceError::invalid_field(field, REQUIRED_MESSAGE))
}

pub(crate) fn required_datetime(
    field: &str,
    value: Option<String>,
) -> Result<DateTime<Utc>, ServiceError> {
    let raw = required(field, value)?;
    parse_datetime(&raw).ok_or_else(|| ServiceError::invalid_field(field, DATE_FORMAT_MESSAGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2023-01-10", Utc.with_ymd_and_hms(2023, 1, 10, 0, 0, 0).unwrap())]
    #[case("2023-01-10T08:30:00Z", Utc.with_ymd_and_hms(2023, 1, 10, 8, 30, 0).unwrap())]
    #[case("2023-01-10T10:30:00+02:00", Utc.with_ymd_and_hms(2023, 1, 10, 8, 30, 0).unwrap())]
    #[case(" 2023-01-10 ", Utc.with_ymd_and_hms(2023, 1, 10, 0, 0, 0).unwrap())]
    fn parses_supported_formats(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_datetime(raw), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("10/01/2023")]
    #[case("2023-13-01")]
    #[case("yesterday")]
    fn rejects_unsupported_formats(#[case] raw: &str) {
        assert_eq!(parse_datetime(raw), None);
        assert!(validate_datetime(raw).is_err());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("x").is_ok());
    }

    #[test]
    fn required_reports_the_field_name() {
        match required::<i32>("quantity", None) {
            Err(ServiceError::ValidationError(fields)) => {
                assert_eq!(
                    fields.get("quantity"),
                    Some(&vec![REQUIRED_MESSAGE.to_string()])
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
