//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, ListingService};
use crate::domain::repositories::{ListingRepository, TokenRepository};

/// Services shared across requests.
///
/// Repositories are passed in as trait objects, so the same router serves a
/// PostgreSQL-backed deployment or an in-memory one.
#[derive(Clone)]
pub struct AppState {
    pub listing_service: Arc<ListingService<dyn ListingRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
}

impl AppState {
    /// Wires services on top of the given repositories.
    ///
    /// `signing_secret` is the HMAC key API tokens were hashed with.
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        tokens: Arc<dyn TokenRepository>,
        signing_secret: String,
    ) -> Self {
        Self {
            listing_service: Arc::new(ListingService::new(listings)),
            auth_service: Arc::new(AuthService::new(tokens, signing_secret)),
        }
    }
}
