//! Core domain entities.
//!
//! - [`Listing`] - A travel listing
//! - [`NewListing`] - Input for creating a listing
//! - [`ListingChanges`] - Field changes for full or partial updates
//! - [`ListingStatus`] - Caller-set publication status

pub mod listing;

pub use listing::{
    Listing, ListingChanges, ListingStatus, NewListing, PricePrecisionError, UnknownStatus,
    check_price_precision,
};
