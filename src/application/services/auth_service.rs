//! Bearer token checks for the listing routes.

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. Shared by the server and
/// the admin CLI so tokens created offline validate online.
///
/// # Errors
///
/// HMAC accepts keys of any length, so this only fails if the underlying
/// implementation changes.
pub fn hash_token(signing_secret: &str, token: &str) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())?;
    mac.update(token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks Bearer tokens against the stored digests.
///
/// Only `hash_token(signing_secret, token)` is ever compared, so a copy of
/// the `api_tokens` table alone cannot be used to authenticate.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// `signing_secret` must be the key the tokens were issued with.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Accepts `token` if its digest matches an active stored token, then
    /// records the use. Failing to record the use only logs a warning.
    ///
    /// # Errors
    ///
    /// [`AppError::Unauthorized`] for unknown or revoked tokens,
    /// [`AppError::Internal`] when storage fails.
    pub async fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(&self.signing_secret, token).map_err(|e| {
            AppError::internal("Token hashing failed", json!({"reason": e.to_string()}))
        })?;

        if !self.repository.validate_token(&token_hash).await? {
            tracing::debug!("Rejected unknown or revoked API token");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        }

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, "Failed to update token last_used_at");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTokenRepository;

    const SECRET: &str = "listings-signing-secret";

    fn service(repo: MockTokenRepository) -> AuthService<MockTokenRepository> {
        AuthService::new(Arc::new(repo), SECRET.to_string())
    }

    #[tokio::test]
    async fn test_matching_token_is_accepted_and_touched() {
        let mut repo = MockTokenRepository::new();

        let token = "valid-token";
        let expected_hash = hash_token(SECRET, token).unwrap();

        repo.expect_validate_token()
            .withf(move |hash| hash == &expected_hash)
            .times(1)
            .returning(|_| Ok(true));

        repo.expect_update_last_used()
            .times(1)
            .returning(|_| Ok(()));

        assert!(service(repo).authenticate(token).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_or_revoked_token_is_rejected() {
        let mut repo = MockTokenRepository::new();

        repo.expect_validate_token()
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_update_last_used().never();

        let result = service(repo).authenticate("revoked-token").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_last_used_failure_does_not_reject() {
        let mut repo = MockTokenRepository::new();

        repo.expect_validate_token()
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_update_last_used()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        assert!(service(repo).authenticate("valid-token").await.is_ok());
    }

    #[test]
    fn test_hash_is_stable_hex() {
        let digest = hash_token(SECRET, "abc").unwrap();

        assert_eq!(digest, hash_token(SECRET, "abc").unwrap());
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_token_different_inputs() {
        assert_ne!(
            hash_token(SECRET, "token1").unwrap(),
            hash_token(SECRET, "token2").unwrap()
        );
    }

    #[test]
    fn test_hash_token_secret_matters() {
        // Same token, different secrets -> different hashes
        assert_ne!(
            hash_token("secret-a", "token").unwrap(),
            hash_token("secret-b", "token").unwrap()
        );
    }
}
