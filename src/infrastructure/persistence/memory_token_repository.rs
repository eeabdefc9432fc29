//! In-memory implementation of token repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

/// API token store held in process memory.
#[derive(Default)]
pub struct MemoryTokenRepository {
    tokens: RwLock<Vec<ApiToken>>,
}

impl MemoryTokenRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn validate_token(&self, token_hash: &str) -> Result<bool, AppError> {
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .any(|t| t.token_hash == token_hash && !t.is_revoked()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.write().await;

        if tokens.iter().any(|t| t.token_hash == token_hash) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({"constraint": "api_tokens_token_hash_key"}),
            ));
        }

        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());

        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens = self.tokens.read().await.clone();
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.tokens.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().await;

        match tokens.iter_mut().find(|t| t.id == id && !t.is_revoked()) {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found(
                "Token not found or already revoked",
                json!({"id": id}),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_validate() {
        let repo = MemoryTokenRepository::new();
        repo.create_token("ci", "abc123").await.unwrap();

        assert!(repo.validate_token("abc123").await.unwrap());
        assert!(!repo.validate_token("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_hash_conflicts() {
        let repo = MemoryTokenRepository::new();
        repo.create_token("first", "same").await.unwrap();

        let result = repo.create_token("second", "same").await;
        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_revoked_token_is_invalid() {
        let repo = MemoryTokenRepository::new();
        let token = repo.create_token("ci", "abc123").await.unwrap();

        repo.revoke_token(token.id).await.unwrap();

        assert!(!repo.validate_token("abc123").await.unwrap());
        assert!(matches!(
            repo.revoke_token(token.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_update_last_used() {
        let repo = MemoryTokenRepository::new();
        let token = repo.create_token("ci", "abc123").await.unwrap();
        assert!(token.last_used_at.is_none());

        repo.update_last_used("abc123").await.unwrap();

        let stored = repo.find_by_name("ci").await.unwrap().unwrap();
        assert!(stored.last_used_at.is_some());
    }
}
