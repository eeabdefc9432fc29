//! Repository trait for listing storage.

use crate::domain::entities::{Listing, ListingChanges, NewListing};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for travel listings.
///
/// The store assigns `id` and owns both timestamps: `created_at` is set once,
/// `updated_at` moves strictly forward on every update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgListingRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryListingRepository`] - in-process
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Inserts a listing and returns it with `id` and timestamps assigned.
    ///
    /// `created_at` and `updated_at` are equal on the returned record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_listing: NewListing) -> Result<Listing, AppError>;

    /// Finds a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Listing>, AppError>;

    /// Lists all listings, newest first (`created_at DESC, id DESC`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self) -> Result<Vec<Listing>, AppError>;

    /// Applies `changes` and refreshes `updated_at`.
    ///
    /// Returns `Ok(None)` if the listing does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update(&self, id: i64, changes: ListingChanges) -> Result<Option<Listing>, AppError>;

    /// Removes a listing.
    ///
    /// Returns `true` if a row was removed, `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Checks that the underlying storage is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the storage cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
