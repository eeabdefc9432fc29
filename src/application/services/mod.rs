//! Business logic services for the application layer.

pub mod auth_service;
pub mod listing_service;

pub use auth_service::{AuthService, hash_token};
pub use listing_service::ListingService;
