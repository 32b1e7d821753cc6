use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Field name to the list of messages explaining why it was rejected.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Bad Request",
    "message": "Validation failed",
    "errors": { "vendor_code": ["vendor with this vendor_code already exists"] },
    "request_id": "req-abc123xyz",
    "timestamp": "2024-03-01T10:30:00+00:00"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Per-field validation messages
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
    /// Request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// RFC 3339 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {}", summarize(.0))]
    ValidationError(FieldErrors),
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errors) in err.field_errors() {
            let messages = fields.entry(field.to_string()).or_default();
            for error in errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", error.code));
                messages.push(message);
            }
        }
        ServiceError::ValidationError(fields)
    }
}

impl ServiceError {
    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        ServiceError::ValidationError(fields)
    }

    pub fn not_found(entity: &str, id: i32) -> Self {
        ServiceError::NotFound(format!("{} with ID {} not found", entity, id))
    }

    /// Translate constraint violations raised by the database on insert/update.
    ///
    /// Unique violations are attributed to `unique_field`, foreign key
    /// violations to `foreign_field`; anything else stays a database error.
    pub fn from_write_error(err: DbErr, unique_field: &str, foreign_field: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::invalid_field(
                unique_field,
                format!("an entry with this {} already exists", unique_field),
            ),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::invalid_field(
                foreign_field,
                format!("{} does not reference an existing record", foreign_field),
            ),
            _ => ServiceError::DatabaseError(err),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message suitable for HTTP responses; internal errors stay generic.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::ValidationError(_) => "Validation failed".to_string(),
            _ => self.to_string(),
        }
    }

    fn field_errors(&self) -> FieldErrors {
        match self {
            Self::ValidationError(fields) => fields.clone(),
            _ => FieldErrors::new(),
        }
    }
}

fn error_response(status: StatusCode, message: String, errors: FieldErrors) -> Response {
    let body = ErrorResponse {
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message,
        errors,
        request_id: current_request_id(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (status, Json(body)).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        error_response(status, self.response_message(), self.field_errors())
    }
}

/// API Error type for HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        errors: FieldErrors,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ServiceError(service_error) => service_error.into_response(),
            ApiError::BadRequest { message, errors } => {
                error_response(StatusCode::BAD_REQUEST, message, errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    async fn body_of(response: Response) -> ErrorResponse {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::not_found("Vendor", 7).into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let payload = body_of(response).await;
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
        assert_eq!(payload.message, "Not found: Vendor with ID 7 not found");
        assert!(payload.errors.is_empty());
    }

    #[tokio::test]
    async fn validation_error_body_maps_fields_to_messages() {
        let response = ServiceError::invalid_field("vendor_code", "already taken").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payload = body_of(response).await;
        assert_eq!(payload.error, "Bad Request");
        assert_eq!(
            payload.errors.get("vendor_code"),
            Some(&vec!["already taken".to_string()])
        );
    }

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::invalid_field("x", "y").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_message_hides_internal_details() {
        let err = ServiceError::DatabaseError(DbErr::Custom("secret table".into()));
        assert_eq!(err.response_message(), "Database error");
        assert!(!err.response_message().contains("secret"));
    }

    #[test]
    fn non_constraint_write_errors_stay_database_errors() {
        let err = ServiceError::from_write_error(
            DbErr::Custom("disk full".into()),
            "vendor_code",
            "vendor",
        );
        assert!(matches!(err, ServiceError::DatabaseError(_)));
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "This field may not be blank."))]
        name: String,
    }

    #[test]
    fn validator_errors_convert_to_field_map() {
        let err: ServiceError = Sample {
            name: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();

        match err {
            ServiceError::ValidationError(fields) => {
                assert_eq!(
                    fields.get("name"),
                    Some(&vec!["This field may not be blank.".to_string()])
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_request_renders_as_400() {
        let response = ApiError::BadRequest {
            message: "Invalid JSON body".into(),
            errors: FieldErrors::new(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await.message, "Invalid JSON body");
    }
}
