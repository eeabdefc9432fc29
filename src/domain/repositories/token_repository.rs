//! API token records and their storage trait.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A stored API token. The raw value is never persisted, only its digest.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Storage for the API tokens that guard the listing routes.
///
/// Every method takes or returns HMAC digests from
/// [`crate::application::services::auth_service::hash_token`], never raw
/// tokens. [`crate::infrastructure::persistence::PgTokenRepository`] backs the
/// server and admin CLI; [`crate::infrastructure::persistence::MemoryTokenRepository`]
/// backs the HTTP tests. `MockTokenRepository` exists under `cfg(test)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// `true` when `token_hash` belongs to a token that has not been revoked.
    async fn validate_token(&self, token_hash: &str) -> Result<bool, AppError>;

    /// Stamps `last_used_at` with the current time.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Stores a new active token under `name`.
    ///
    /// # Errors
    ///
    /// [`AppError::Conflict`] when the digest is already stored.
    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError>;

    /// All tokens, revoked ones included, newest first.
    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError>;

    /// Sets `revoked_at`; the token stops authenticating immediately.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when no active token has this id.
    async fn revoke_token(&self, id: i64) -> Result<(), AppError>;
}
