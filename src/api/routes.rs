//! Listing resource routes.
//!
//! All routes here require Bearer token authentication via
//! [`crate::api::middleware::auth`], applied in [`crate::routes::build_router`].

use crate::api::handlers::{
    create_listing_handler, delete_listing_handler, get_listing_handler, list_listings_handler,
    replace_listing_handler, update_listing_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Listing collection routes mounted at `prefix`.
///
/// `prefix` must start with `/` and have no trailing slash
/// (see [`crate::config::Config::validate`]).
///
/// # Endpoints
///
/// - `GET    {prefix}`        - List listings, newest first
/// - `POST   {prefix}`        - Create a listing
/// - `GET    {prefix}/{id}`   - Read a listing
/// - `PUT    {prefix}/{id}`   - Replace a listing
/// - `PATCH  {prefix}/{id}`   - Partially update a listing
/// - `DELETE {prefix}/{id}`   - Delete a listing
pub fn listing_routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(
            prefix,
            get(list_listings_handler).post(create_listing_handler),
        )
        .route(
            &format!("{prefix}/{{id}}"),
            get(get_listing_handler)
                .put(replace_listing_handler)
                .patch(update_listing_handler)
                .delete(delete_listing_handler),
        )
}
