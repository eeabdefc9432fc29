//! Repository implementations.
//!
//! PostgreSQL repositories use SQLx with bound parameters for SQL injection
//! protection. In-memory repositories back the integration tests and can be
//! used when embedding the API without a database.
//!
//! # Repositories
//!
//! - [`PgListingRepository`] - Listing storage in PostgreSQL
//! - [`PgTokenRepository`] - API token storage and validation in PostgreSQL
//! - [`MemoryListingRepository`] - Listing storage in process memory
//! - [`MemoryTokenRepository`] - API token storage in process memory

pub mod memory_listing_repository;
pub mod memory_token_repository;
pub mod pg_listing_repository;
pub mod pg_token_repository;

pub use memory_listing_repository::MemoryListingRepository;
pub use memory_token_repository::MemoryTokenRepository;
pub use pg_listing_repository::PgListingRepository;
pub use pg_token_repository::PgTokenRepository;
