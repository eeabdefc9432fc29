//! Application layer services.
//!
//! Services consume repository traits and provide the operations HTTP
//! handlers call.
//!
//! # Available Services
//!
//! - [`services::listing_service::ListingService`] - Listing CRUD
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
