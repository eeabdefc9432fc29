//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`        - Storage health check (public)
//! - `{listings_route}/*`  - Listing resource (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token, listing routes only
//! - **Path normalization** - Trailing slashes are trimmed, so `/listings/`
//!   and `/listings/1/` reach the same handlers as `/listings` and `/listings/1`

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Public health check path. The listing resource cannot be mounted here.
pub const HEALTH_ROUTE: &str = "/health";

/// Builds the router with all routes and middleware, without path
/// normalization.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `listings_route` - collection path for the listing resource, e.g. `/listings`
pub fn build_router(state: AppState, listings_route: &str) -> Router {
    let listings = api::routes::listing_routes(listings_route)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route(HEALTH_ROUTE, get(health_handler))
        .merge(listings)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service: [`build_router`] wrapped in
/// trailing-slash normalization.
pub fn app_router(state: AppState, listings_route: &str) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, listings_route))
}
