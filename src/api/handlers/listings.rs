//! Handlers for the listing resource.
//!
//! All handlers sit behind [`crate::api::middleware::auth`], so by the time
//! they run the caller has presented a valid Bearer token.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::api::dto::listing::{ListingPatchRequest, ListingRequest, ListingResponse};
use crate::api::extract::{ListingId, ValidatedJson};
use crate::error::AppError;
use crate::state::AppState;

/// Lists all listings, newest first.
///
/// # Endpoint
///
/// `GET /listings`
pub async fn list_listings_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ListingResponse>>, AppError> {
    let listings = state.listing_service.list().await?;

    Ok(Json(
        listings.into_iter().map(ListingResponse::from).collect(),
    ))
}

/// Creates a listing.
///
/// # Endpoint
///
/// `POST /listings`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Beach House",
///   "description": "Ocean view",
///   "location": "Malibu",
///   "price": "199.99",
///   "status": "active"   // optional, defaults to "pending"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with per-field messages if validation fails.
pub async fn create_listing_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ListingRequest>,
) -> Result<(StatusCode, Json<ListingResponse>), AppError> {
    let listing = state
        .listing_service
        .create(payload.into_new_listing()?)
        .await?;

    Ok((StatusCode::CREATED, Json(listing.into())))
}

/// Returns a single listing.
///
/// # Endpoint
///
/// `GET /listings/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the listing doesn't exist or `id` is not an
/// integer.
pub async fn get_listing_handler(
    ListingId(id): ListingId,
    State(state): State<AppState>,
) -> Result<Json<ListingResponse>, AppError> {
    let listing = state.listing_service.get(id).await?;

    Ok(Json(listing.into()))
}

/// Replaces a listing's content.
///
/// # Endpoint
///
/// `PUT /listings/{id}`
///
/// Requires the same fields as create. An omitted `status` keeps its current
/// value.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the listing doesn't exist.
pub async fn replace_listing_handler(
    ListingId(id): ListingId,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ListingRequest>,
) -> Result<Json<ListingResponse>, AppError> {
    let listing = state
        .listing_service
        .update(id, payload.into_replacement()?)
        .await?;

    Ok(Json(listing.into()))
}

/// Partially updates a listing.
///
/// # Endpoint
///
/// `PATCH /listings/{id}`
///
/// All fields are optional. Only provided fields are changed; `updated_at` is
/// refreshed even when the body is empty.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the listing doesn't exist.
pub async fn update_listing_handler(
    ListingId(id): ListingId,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ListingPatchRequest>,
) -> Result<Json<ListingResponse>, AppError> {
    let listing = state
        .listing_service
        .update(id, payload.into_changes()?)
        .await?;

    Ok(Json(listing.into()))
}

/// Deletes a listing.
///
/// # Endpoint
///
/// `DELETE /listings/{id}`
///
/// The record is removed permanently.
///
/// # Errors
///
/// Returns 404 Not Found if the listing doesn't exist.
pub async fn delete_listing_handler(
    ListingId(id): ListingId,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.listing_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
