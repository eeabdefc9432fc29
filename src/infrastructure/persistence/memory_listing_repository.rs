//! In-memory implementation of listing repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::listing::PRICE_DECIMAL_PLACES;
use crate::domain::entities::{Listing, ListingChanges, NewListing};
use crate::domain::repositories::ListingRepository;
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    listings: HashMap<i64, Listing>,
}

/// Listing store held in process memory.
///
/// Writes are serialized through a single lock. Timestamps follow the same
/// rules as the PostgreSQL store: equal on insert, strictly increasing on update.
#[derive(Default)]
pub struct MemoryListingRepository {
    inner: RwLock<Inner>,
}

impl MemoryListingRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Next `updated_at` value: now, or one microsecond past `previous` if the
/// clock has not advanced.
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    let floor = previous + Duration::microseconds(1);
    if now > floor { now } else { floor }
}

/// Stores prices at the column scale, so `199.9` reads back as `199.90`.
fn at_column_scale(mut price: Decimal) -> Decimal {
    price.rescale(PRICE_DECIMAL_PLACES);
    price
}

#[async_trait]
impl ListingRepository for MemoryListingRepository {
    async fn create(&self, new_listing: NewListing) -> Result<Listing, AppError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let now = Utc::now();
        let listing = Listing {
            id: inner.next_id,
            title: new_listing.title,
            description: new_listing.description,
            location: new_listing.location,
            price: at_column_scale(new_listing.price),
            status: new_listing.status,
            created_at: now,
            updated_at: now,
        };

        inner.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Listing>, AppError> {
        Ok(self.inner.read().await.listings.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Listing>, AppError> {
        let mut listings: Vec<Listing> = self.inner.read().await.listings.values().cloned().collect();
        listings.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(listings)
    }

    async fn update(&self, id: i64, changes: ListingChanges) -> Result<Option<Listing>, AppError> {
        let mut inner = self.inner.write().await;

        let Some(listing) = inner.listings.get_mut(&id) else {
            return Ok(None);
        };

        listing.apply(&changes);
        listing.price = at_column_scale(listing.price);
        listing.updated_at = next_updated_at(listing.updated_at);

        Ok(Some(listing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.inner.write().await.listings.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ListingStatus;

    fn new_listing(title: &str) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: "Ocean view".to_string(),
            location: "Malibu".to_string(),
            price: Decimal::new(19999, 2),
            status: ListingStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = MemoryListingRepository::new();

        let first = repo.create(new_listing("One")).await.unwrap();
        let second = repo.create(new_listing("Two")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = MemoryListingRepository::new();
        for title in ["A", "B", "C"] {
            repo.create(new_listing(title)).await.unwrap();
        }

        let listings = repo.list().await.unwrap();
        let ids: Vec<i64> = listings.iter().map(|l| l.id).collect();

        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_update_moves_updated_at_forward() {
        let repo = MemoryListingRepository::new();
        let created = repo.create(new_listing("Cabin")).await.unwrap();

        let first = repo
            .update(created.id, ListingChanges::default())
            .await
            .unwrap()
            .unwrap();
        let second = repo
            .update(created.id, ListingChanges::default())
            .await
            .unwrap()
            .unwrap();

        assert!(first.updated_at > created.updated_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = MemoryListingRepository::new();
        let result = repo.update(42, ListingChanges::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_price_stored_at_two_places() {
        let repo = MemoryListingRepository::new();
        let mut listing = new_listing("Cabin");
        listing.price = Decimal::new(1999, 1);

        let created = repo.create(listing).await.unwrap();

        assert_eq!(created.price.to_string(), "199.90");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MemoryListingRepository::new();
        let created = repo.create(new_listing("Cabin")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }

    #[test]
    fn test_next_updated_at_never_goes_back() {
        let future = Utc::now() + Duration::hours(1);
        assert_eq!(next_updated_at(future), future + Duration::microseconds(1));
    }
}
