#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use travel_listings::application::services::hash_token;
use travel_listings::domain::repositories::TokenRepository;
use travel_listings::infrastructure::persistence::{
    MemoryListingRepository, MemoryTokenRepository,
};
use travel_listings::routes::build_router;
use travel_listings::state::AppState;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const TOKEN: &str = "test-api-token";
pub const REVOKED_TOKEN: &str = "revoked-api-token";
pub const LISTINGS: &str = "/listings";

/// State backed by in-memory stores, with [`TOKEN`] active and
/// [`REVOKED_TOKEN`] revoked.
pub async fn create_test_state() -> AppState {
    let tokens = Arc::new(MemoryTokenRepository::new());

    tokens
        .create_token("test", &hash_token(SIGNING_SECRET, TOKEN).unwrap())
        .await
        .unwrap();
    let revoked = tokens
        .create_token("revoked", &hash_token(SIGNING_SECRET, REVOKED_TOKEN).unwrap())
        .await
        .unwrap();
    tokens.revoke_token(revoked.id).await.unwrap();

    AppState::new(
        Arc::new(MemoryListingRepository::new()),
        tokens,
        SIGNING_SECRET.to_string(),
    )
}

pub async fn make_server() -> TestServer {
    let state = create_test_state().await;
    TestServer::new(build_router(state, LISTINGS)).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn beach_house() -> Value {
    json!({
        "title": "Beach House",
        "description": "Ocean view",
        "location": "Malibu",
        "price": "199.99",
        "status": "active"
    })
}

/// Creates a listing through the API and returns its JSON representation.
pub async fn create_listing(server: &TestServer, body: Value) -> Value {
    let response = server
        .post(LISTINGS)
        .add_header("Authorization", bearer(TOKEN))
        .json(&body)
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}
