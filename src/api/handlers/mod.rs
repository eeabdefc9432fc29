//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod listings;

pub use health::health_handler;
pub use listings::{
    create_listing_handler, delete_listing_handler, get_listing_handler, list_listings_handler,
    replace_listing_handler, update_listing_handler,
};
