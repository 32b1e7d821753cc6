use crate::errors::{ApiError, FieldErrors, ServiceError};
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate a request body and convert it into its typed input
pub fn validate_input<R, I>(payload: R) -> Result<I, ApiError>
where
    I: TryFrom<R, Error = ServiceError>,
{
    I::try_from(payload).map_err(map_service_error)
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// JSON body extractor whose rejections render as 400 `ErrorResponse`s.
///
/// Covers malformed JSON, wrong field types and a missing
/// `Content-Type: application/json` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection_to_api_error(rejection)),
        }
    }
}

fn json_rejection_to_api_error(rejection: JsonRejection) -> ApiError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        _ => "Invalid JSON body".to_string(),
    };

    let mut errors = FieldErrors::new();
    errors.insert("non_field_errors".to_string(), vec![rejection.body_text()]);

    ApiError::BadRequest { message, errors }
}
