//! HTTP error responses.
//!
//! Validation failures render as `{"detail": [{"loc", "msg", "type"}, ...]}` with status 422,
//! every other client error as `{"detail": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use booking_flow::{BookingError, FieldErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// One entry of a 422 `detail` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationDetail {
    pub fn new<L, S>(loc: L, msg: impl Into<String>, kind: impl Into<String>) -> Self
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loc: loc.into_iter().map(Into::into).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    pub fn missing(loc: &[&str]) -> Self {
        Self::new(loc.iter().copied(), "Field required", "missing")
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(Vec<ValidationDetail>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}: {details}")]
    Internal { message: String, details: String },
}

impl ApiError {
    pub fn validation(detail: ValidationDetail) -> Self {
        Self::Validation(vec![detail])
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>, details: impl ToString) -> Self {
        Self::Internal {
            message: message.into(),
            details: details.to_string(),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidRequestId(message) => Self::BadRequest(message),
            BookingError::InvalidField {
                field,
                kind: FieldErrorKind::Malformed,
                message,
            } => Self::validation(ValidationDetail::new(
                ["body", "params", field.as_str()],
                message,
                "int_parsing",
            )),
            err @ BookingError::InvalidField {
                kind: FieldErrorKind::Rejected,
                ..
            } => Self::BadRequest(err.to_string()),
            BookingError::Storage(details) => Self::internal("Booking storage failed", details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(detail) => {
                warn!(?detail, "rejecting invalid request");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": detail })),
                )
                    .into_response()
            }
            ApiError::BadRequest(message) => {
                warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": message }))).into_response()
            }
            ApiError::Internal { message, details } => {
                error!(%message, %details, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": message })),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<axum::Json<T>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_field_becomes_validation_error() {
        let err: ApiError = BookingError::malformed("age", "Input should be a valid integer").into();
        match err {
            ApiError::Validation(detail) => {
                assert_eq!(detail[0].loc, vec!["body", "params", "age"]);
                assert_eq!(detail[0].kind, "int_parsing");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_rejected_field_and_request_id_are_bad_requests() {
        let err: ApiError = BookingError::rejected("country", "unknown").into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = BookingError::InvalidRequestId("empty".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_detail_serialises_type_key() {
        let value = serde_json::to_value(ValidationDetail::missing(&["body", "request_id"])).unwrap();
        assert_eq!(value["type"], "missing");
        assert_eq!(value["msg"], "Field required");
        assert_eq!(value["loc"], json!(["body", "request_id"]));
    }
}
