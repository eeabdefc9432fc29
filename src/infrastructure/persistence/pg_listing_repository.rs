//! PostgreSQL implementation of listing repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Listing, ListingChanges, ListingStatus, NewListing};
use crate::domain::repositories::ListingRepository;
use crate::error::AppError;

/// Raw `listings` row; `status` is stored as TEXT guarded by a CHECK constraint.
#[derive(Debug, FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: String,
    location: String,
    price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = AppError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let status: ListingStatus = row.status.parse().map_err(|_| {
            AppError::internal(
                "Corrupt listing status in database",
                json!({"id": row.id, "status": row.status}),
            )
        })?;

        Ok(Listing {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            price: row.price,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL repository for listing storage.
///
/// `created_at` and `updated_at` default to the same `NOW()` on insert.
/// Updates bump `updated_at` to at least one microsecond past its previous value
/// so it always moves forward, even when the clock does not.
pub struct PgListingRepository {
    pool: Arc<PgPool>,
}

impl PgListingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingRepository for PgListingRepository {
    async fn create(&self, new_listing: NewListing) -> Result<Listing, AppError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            INSERT INTO listings (title, description, location, price, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, location, price, status, created_at, updated_at
            "#,
        )
        .bind(new_listing.title)
        .bind(new_listing.description)
        .bind(new_listing.location)
        .bind(new_listing.price)
        .bind(new_listing.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Listing>, AppError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT id, title, description, location, price, status, created_at, updated_at
            FROM listings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Listing::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Listing>, AppError> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT id, title, description, location, price, status, created_at, updated_at
            FROM listings
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    async fn update(&self, id: i64, changes: ListingChanges) -> Result<Option<Listing>, AppError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            UPDATE listings SET
                title       = COALESCE($2::TEXT, title),
                description = COALESCE($3::TEXT, description),
                location    = COALESCE($4::TEXT, location),
                price       = COALESCE($5::NUMERIC, price),
                status      = COALESCE($6::TEXT, status),
                updated_at  = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING id, title, description, location, price, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.price)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Listing::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
