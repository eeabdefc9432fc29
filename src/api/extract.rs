//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// JSON body extractor that runs `validator` rules before the handler.
///
/// Malformed bodies (syntax errors, a non-object body, missing content type)
/// and rule violations both become [`AppError::Validation`], so every bad
/// request gets the same 400 error envelope. Field-level type errors are
/// left to the DTO's own rules so they are reported under the field name.
///
/// # Example
///
/// ```rust,ignore
/// async fn create(ValidatedJson(payload): ValidatedJson<ListingRequest>) { ... }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(
                    "Invalid request body",
                    json!({ "body": [rejection.body_text()] }),
                )
            })?;

        value.validate()?;

        Ok(Self(value))
    }
}

/// Listing id taken from the `{id}` path segment.
///
/// A segment that is not a valid `i64` cannot name a stored listing, so it is
/// answered like any other unknown id: a JSON 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingId(pub i64);

impl<S> FromRequestParts<S> for ListingId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(
                    "Invalid path",
                    json!({ "path": [rejection.body_text()] }),
                )
            })?;

        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| AppError::not_found("Listing not found", json!({ "id": raw })))
    }
}
