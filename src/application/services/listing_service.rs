//! Listing management service.

use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::domain::entities::{Listing, ListingChanges, NewListing};
use crate::domain::repositories::ListingRepository;
use crate::error::AppError;

/// Service for creating, reading, updating and deleting listings.
///
/// Field rules are checked here as well as at the HTTP boundary, so callers
/// that bypass the API cannot store a listing the database would reject.
pub struct ListingService<R: ListingRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ListingRepository + ?Sized> ListingService<R> {
    /// Creates a new listing service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a listing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field breaks its constraints.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create(&self, new_listing: NewListing) -> Result<Listing, AppError> {
        new_listing.validate()?;

        let listing = self.repository.create(new_listing).await?;
        tracing::info!(listing_id = listing.id, status = %listing.status, "Listing created");

        Ok(listing)
    }

    /// Retrieves a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the listing does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get(&self, id: i64) -> Result<Listing, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Lists all listings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list(&self) -> Result<Vec<Listing>, AppError> {
        self.repository.list().await
    }

    /// Applies `changes` to an existing listing and refreshes `updated_at`.
    ///
    /// Serves both full and partial updates: a full update passes every
    /// content field, a partial one only the fields it changes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field breaks its constraints.
    /// Returns [`AppError::NotFound`] if the listing does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn update(&self, id: i64, changes: ListingChanges) -> Result<Listing, AppError> {
        changes.validate()?;

        let listing = self
            .repository
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(listing_id = id, "Listing updated");

        Ok(listing)
    }

    /// Deletes a listing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the listing does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(listing_id = id, "Listing deleted");

        Ok(())
    }

    /// Checks that listing storage is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if storage cannot be queried.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Listing not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ListingStatus;
    use crate::domain::repositories::MockListingRepository;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn new_listing() -> NewListing {
        NewListing {
            title: "Beach House".to_string(),
            description: "Ocean view".to_string(),
            location: "Malibu".to_string(),
            price: Decimal::new(19999, 2),
            status: ListingStatus::Pending,
        }
    }

    fn stored(id: i64, new_listing: NewListing) -> Listing {
        let now = Utc::now();
        Listing {
            id,
            title: new_listing.title,
            description: new_listing.description,
            location: new_listing.location,
            price: new_listing.price,
            status: new_listing.status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_success() {
        let mut mock_repo = MockListingRepository::new();

        mock_repo
            .expect_create()
            .withf(|l| l.title == "Beach House" && l.status == ListingStatus::Pending)
            .times(1)
            .returning(|l| Ok(stored(1, l)));

        let service = ListingService::new(Arc::new(mock_repo));

        let listing = service.create(new_listing()).await.unwrap();

        assert_eq!(listing.id, 1);
        assert_eq!(listing.created_at, listing.updated_at);
    }

    #[tokio::test]
    async fn test_create_invalid_price_never_reaches_store() {
        let mut mock_repo = MockListingRepository::new();
        mock_repo.expect_create().never();

        let service = ListingService::new(Arc::new(mock_repo));

        let result = service
            .create(NewListing {
                price: Decimal::new(12345678900, 2),
                ..new_listing()
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mut mock_repo = MockListingRepository::new();

        mock_repo
            .expect_find_by_id()
            .withf(|id| *id == 99)
            .times(1)
            .returning(|_| Ok(None));

        let service = ListingService::new(Arc::new(mock_repo));

        let result = service.get(99).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let mut mock_repo = MockListingRepository::new();

        mock_repo.expect_update().times(1).returning(|_, _| Ok(None));

        let service = ListingService::new(Arc::new(mock_repo));

        let result = service
            .update(
                5,
                ListingChanges {
                    status: Some(ListingStatus::Active),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_blank_title_rejected() {
        let mut mock_repo = MockListingRepository::new();
        mock_repo.expect_update().never();

        let service = ListingService::new(Arc::new(mock_repo));

        let result = service
            .update(
                1,
                ListingChanges {
                    title: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let mut mock_repo = MockListingRepository::new();

        mock_repo.expect_delete().times(1).returning(|_| Ok(false));

        let service = ListingService::new(Arc::new(mock_repo));

        let result = service.delete(3).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_success() {
        let mut mock_repo = MockListingRepository::new();

        mock_repo
            .expect_delete()
            .withf(|id| *id == 3)
            .times(1)
            .returning(|_| Ok(true));

        let service = ListingService::new(Arc::new(mock_repo));

        assert!(service.delete(3).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_passes_through_order() {
        let mut mock_repo = MockListingRepository::new();

        mock_repo
            .expect_list()
            .times(1)
            .returning(|| Ok(vec![stored(2, new_listing()), stored(1, new_listing())]));

        let service = ListingService::new(Arc::new(mock_repo));

        let ids: Vec<i64> = service.list().await.unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
