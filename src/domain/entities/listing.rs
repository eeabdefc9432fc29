//! Listing entity representing a travel property or offering.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Maximum number of significant digits in a price.
pub const PRICE_MAX_DIGITS: u32 = 10;
/// Maximum number of digits after the decimal point in a price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Publication status of a listing.
///
/// Set by callers; nothing in the service transitions it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    #[default]
    Pending,
    Inactive,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Active,
        ListingStatus::Pending,
        ListingStatus::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Pending => "pending",
            ListingStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known statuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" is not a valid choice.")]
pub struct UnknownStatus(pub String);

impl FromStr for ListingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A persisted travel listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price: Decimal,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Applies every field present in `changes` to this listing.
    ///
    /// Timestamps are left alone; the store owns them.
    pub fn apply(&mut self, changes: &ListingChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(location) = &changes.location {
            self.location = location.clone();
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

/// Input data for creating a new listing.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewListing {
    #[validate(
        length(max = 200, message = "Ensure this field has no more than 200 characters."),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[validate(
        length(max = 100, message = "Ensure this field has no more than 100 characters."),
        custom(function = "not_blank")
    )]
    pub location: String,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    pub status: ListingStatus,
}

/// Field changes for an existing listing.
///
/// `None` leaves the field unchanged. A full replacement is simply a
/// value with every content field set.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ListingChanges {
    #[validate(
        length(max = 200, message = "Ensure this field has no more than 200 characters."),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,

    #[validate(
        length(max = 100, message = "Ensure this field has no more than 100 characters."),
        custom(function = "not_blank")
    )]
    pub location: Option<String>,

    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,

    pub status: Option<ListingStatus>,
}

/// Precision violation for a price value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricePrecisionError {
    #[error("Ensure that there are no more than 10 digits in total.")]
    TooManyDigits,
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimalPlaces,
    #[error("Ensure that there are no more than 8 digits before the decimal point.")]
    TooManyWholeDigits,
}

/// Checks a price against `NUMERIC(10, 2)`.
///
/// Digits are counted as written, so `"1.500"` has three decimal places
/// even though the trailing zero is insignificant.
pub fn check_price_precision(price: &Decimal) -> Result<(), PricePrecisionError> {
    let digits = count_digits(price.mantissa().unsigned_abs());
    let scale = price.scale();

    let (total_digits, whole_digits, decimal_places) = if digits > scale {
        (digits, digits - scale, scale)
    } else {
        (scale, 0, scale)
    };

    if total_digits > PRICE_MAX_DIGITS {
        return Err(PricePrecisionError::TooManyDigits);
    }
    if decimal_places > PRICE_DECIMAL_PLACES {
        return Err(PricePrecisionError::TooManyDecimalPlaces);
    }
    if whole_digits > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        return Err(PricePrecisionError::TooManyWholeDigits);
    }

    Ok(())
}

fn count_digits(mut n: u128) -> u32 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

/// Validator hook for [`check_price_precision`].
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    check_price_precision(price)
        .map_err(|e| ValidationError::new("precision").with_message(e.to_string().into()))
}

/// Rejects empty or whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message("This field may not be blank.".into())
        );
    }
    Ok(())
}
