//! DTOs for the listing resource.
//!
//! The public contract is the explicit field list below: every attribute of a
//! listing goes out, nothing is renamed or hidden. `id`, `created_at` and
//! `updated_at` are read-only and ignored if a client sends them.
//!
//! Request fields are kept as raw JSON until validation, so a wrong type
//! (`"price": "abc"`, `"title": 5`) or an explicit `null` is reported under
//! the field it belongs to instead of failing the whole body.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use validator::{Validate, ValidationError};

use crate::domain::entities::{
    Listing, ListingChanges, ListingStatus, NewListing, check_price_precision,
};
use crate::error::AppError;

const TITLE_MAX_CHARS: usize = 200;
const LOCATION_MAX_CHARS: usize = 100;

/// JSON representation of a listing.
///
/// `price` is serialized as a decimal string (`"199.99"`) so no precision is
/// lost to floating point on the client side.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: ListingStatus,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title,
            description: listing.description,
            location: listing.location,
            price: listing.price,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
            status: listing.status,
        }
    }
}

/// Request body for `POST` and `PUT`.
///
/// `title`, `description`, `location` and `price` are required. `status` is
/// optional: on create it defaults to `pending`, on full update an omitted
/// status keeps its current value.
///
/// `price` accepts a JSON string (`"199.99"`) or number (`199.99`).
#[derive(Debug, Deserialize, Validate)]
pub struct ListingRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "This field is required."),
        custom(function = "check_title")
    )]
    pub title: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "This field is required."),
        custom(function = "check_description")
    )]
    pub description: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "This field is required."),
        custom(function = "check_location")
    )]
    pub location: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "This field is required."),
        custom(function = "check_price")
    )]
    pub price: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "check_status"))]
    pub status: Option<Value>,
}

impl ListingRequest {
    /// Converts a validated create request into a [`NewListing`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for the first field that is absent or
    /// malformed. `validate()` reports all of them at once beforehand.
    pub fn into_new_listing(self) -> Result<NewListing, AppError> {
        let content = self.into_content()?;

        Ok(NewListing {
            title: content.title,
            description: content.description,
            location: content.location,
            price: content.price,
            status: content.status.unwrap_or_default(),
        })
    }

    /// Converts a validated full-update request into [`ListingChanges`] with
    /// every content field set.
    ///
    /// # Errors
    ///
    /// Same as [`ListingRequest::into_new_listing`].
    pub fn into_replacement(self) -> Result<ListingChanges, AppError> {
        let content = self.into_content()?;

        Ok(ListingChanges {
            title: Some(content.title),
            description: Some(content.description),
            location: Some(content.location),
            price: Some(content.price),
            status: content.status,
        })
    }

    fn into_content(self) -> Result<Content, AppError> {
        Ok(Content {
            title: required("title", self.title, parse_title)?,
            description: required("description", self.description, parse_description)?,
            location: required("location", self.location, parse_location)?,
            price: required("price", self.price, parse_price)?,
            status: optional("status", self.status, parse_status)?,
        })
    }
}

struct Content {
    title: String,
    description: String,
    location: String,
    price: Decimal,
    status: Option<ListingStatus>,
}

/// Request body for `PATCH`.
///
/// All fields are optional. Only provided fields are changed; an explicit
/// `null` is rejected.
#[derive(Debug, Deserialize, Validate)]
pub struct ListingPatchRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "check_title"))]
    pub title: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "check_description"))]
    pub description: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "check_location"))]
    pub location: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "check_price"))]
    pub price: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "check_status"))]
    pub status: Option<Value>,
}

impl ListingPatchRequest {
    /// Converts a validated patch request into [`ListingChanges`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for the first malformed field.
    pub fn into_changes(self) -> Result<ListingChanges, AppError> {
        Ok(ListingChanges {
            title: optional("title", self.title, parse_title)?,
            description: optional("description", self.description, parse_description)?,
            location: optional("location", self.location, parse_location)?,
            price: optional("price", self.price, parse_price)?,
            status: optional("status", self.status, parse_status)?,
        })
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing key
/// becomes `None` (through `#[serde(default)]`).
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

type Parser<T> = fn(&Value) -> Result<T, ValidationError>;

fn required<T>(field: &'static str, value: Option<Value>, parse: Parser<T>) -> Result<T, AppError> {
    match value {
        Some(value) => parse(&value).map_err(|e| field_error(field, e)),
        None => Err(AppError::bad_request(
            "Validation failed",
            json!({ field: ["This field is required."] }),
        )),
    }
}

fn optional<T>(
    field: &'static str,
    value: Option<Value>,
    parse: Parser<T>,
) -> Result<Option<T>, AppError> {
    value
        .map(|value| parse(&value).map_err(|e| field_error(field, e)))
        .transpose()
}

fn field_error(field: &'static str, error: ValidationError) -> AppError {
    let message = error
        .message
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string());
    AppError::bad_request("Validation failed", json!({ field: [message] }))
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn reject_null(value: &Value) -> Result<(), ValidationError> {
    if value.is_null() {
        return Err(invalid("null", "This field may not be null.".to_string()));
    }
    Ok(())
}

/// Reads a text field: strings are trimmed, numbers are taken as their
/// decimal text, anything else is rejected.
fn parse_text(value: &Value, max_chars: Option<usize>) -> Result<String, ValidationError> {
    reject_null(value)?;

    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(invalid("invalid", "Not a valid string.".to_string())),
    };

    if text.is_empty() {
        return Err(invalid("blank", "This field may not be blank.".to_string()));
    }
    if let Some(max) = max_chars
        && text.chars().count() > max
    {
        return Err(invalid(
            "max_length",
            format!("Ensure this field has no more than {max} characters."),
        ));
    }

    Ok(text)
}

fn parse_title(value: &Value) -> Result<String, ValidationError> {
    parse_text(value, Some(TITLE_MAX_CHARS))
}

fn parse_description(value: &Value) -> Result<String, ValidationError> {
    parse_text(value, None)
}

fn parse_location(value: &Value) -> Result<String, ValidationError> {
    parse_text(value, Some(LOCATION_MAX_CHARS))
}

/// Reads a price from a JSON string or number and checks its precision.
fn parse_price(value: &Value) -> Result<Decimal, ValidationError> {
    reject_null(value)?;

    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };

    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid("invalid", "A valid number is required.".to_string()))?;

    check_price_precision(&price).map_err(|e| invalid("precision", e.to_string()))?;

    Ok(price)
}

fn parse_status(value: &Value) -> Result<ListingStatus, ValidationError> {
    reject_null(value)?;

    let parsed = match value {
        Value::String(s) => s.trim().parse::<ListingStatus>(),
        other => other.to_string().parse::<ListingStatus>(),
    };

    parsed.map_err(|e| invalid("invalid_choice", e.to_string()))
}

fn check_title(value: &Value) -> Result<(), ValidationError> {
    parse_title(value).map(drop)
}

fn check_description(value: &Value) -> Result<(), ValidationError> {
    parse_description(value).map(drop)
}

fn check_location(value: &Value) -> Result<(), ValidationError> {
    parse_location(value).map(drop)
}

fn check_price(value: &Value) -> Result<(), ValidationError> {
    parse_price(value).map(drop)
}

fn check_status(value: &Value) -> Result<(), ValidationError> {
    parse_status(value).map(drop)
}
