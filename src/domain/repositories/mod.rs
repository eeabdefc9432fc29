//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ListingRepository`] - Listing CRUD operations
//! - [`TokenRepository`] - API token authentication

pub mod listing_repository;
pub mod token_repository;

pub use listing_repository::ListingRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use listing_repository::MockListingRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
