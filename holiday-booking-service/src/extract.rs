use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ValidationDetail};

/// A JSON request body with a known set of required top-level fields
pub trait RequestBody: DeserializeOwned {
    const REQUIRED: &'static [&'static str];
}

/// JSON extractor whose rejections are 422 responses with a `detail` list
///
/// Every missing required field is reported, not only the first one.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: RequestBody + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        parse_body(value).map(ValidatedJson)
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::validation(ValidationDetail::new(
        ["body"],
        rejection.body_text(),
        "json_invalid",
    ))
}

pub fn parse_body<T: RequestBody>(value: Value) -> Result<T, ApiError> {
    let Value::Object(fields) = &value else {
        return Err(ApiError::validation(ValidationDetail::new(
            ["body"],
            "Input should be a valid dictionary or object",
            "model_attributes_type",
        )));
    };

    let missing: Vec<ValidationDetail> = T::REQUIRED
        .iter()
        .filter(|name| fields.get(**name).is_none_or(Value::is_null))
        .map(|name| ValidationDetail::missing(&["body", *name]))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::Validation(missing));
    }

    serde_json::from_value(value).map_err(|e| {
        ApiError::validation(ValidationDetail::new(["body"], e.to_string(), "value_error"))
    })
}
