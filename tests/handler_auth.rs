mod common;

use axum::http::{StatusCode, header};
use common::{LISTINGS, REVOKED_TOKEN, TOKEN, bearer, beach_house, create_listing, make_server};
use serde_json::{Value, json};

#[tokio::test]
async fn test_missing_token_rejected_for_every_route() {
    let server = make_server().await;
    let created = create_listing(&server, beach_house()).await;
    let item = format!("{LISTINGS}/{}", created["id"]);

    let responses = vec![
        server.get(LISTINGS).await,
        server.post(LISTINGS).json(&beach_house()).await,
        server.get(&item).await,
        server.put(&item).json(&beach_house()).await,
        server.patch(&item).json(&json!({ "status": "inactive" })).await,
        server.delete(&item).await,
    ];

    for response in responses {
        response.assert_status_unauthorized();
        assert_eq!(response.header(header::WWW_AUTHENTICATE), "Bearer");

        let body = response.json::<Value>();
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    // Nothing above reached the store.
    let list = server
        .get(LISTINGS)
        .add_header("Authorization", bearer(TOKEN))
        .await
        .json::<Vec<Value>>();
    assert_eq!(list, vec![created]);
}

#[tokio::test]
async fn test_unknown_token_rejected() {
    let server = make_server().await;

    let response = server
        .post(LISTINGS)
        .add_header("Authorization", bearer("not-a-real-token"))
        .json(&beach_house())
        .await;

    response.assert_status_unauthorized();

    let list = server
        .get(LISTINGS)
        .add_header("Authorization", bearer(TOKEN))
        .await
        .json::<Vec<Value>>();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_revoked_token_rejected() {
    let server = make_server().await;

    server
        .get(LISTINGS)
        .add_header("Authorization", bearer(REVOKED_TOKEN))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let server = make_server().await;

    server
        .get(LISTINGS)
        .add_header("Authorization", format!("Basic {TOKEN}"))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_auth_checked_before_validation() {
    let server = make_server().await;

    // Invalid body and no token: authentication wins.
    server
        .post(LISTINGS)
        .json(&json!({ "status": "archived" }))
        .await
        .assert_status_unauthorized();

    // Missing listing and no token: authentication wins.
    server
        .delete(&format!("{LISTINGS}/999"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let server = make_server().await;

    server.get("/health").await.assert_status_ok();
}
