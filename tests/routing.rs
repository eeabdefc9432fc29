mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use common::{TOKEN, bearer, beach_house, create_test_state};
use serde_json::Value;
use tower::ServiceExt;
use travel_listings::routes::{app_router, build_router};

#[tokio::test]
async fn test_trailing_slash_reaches_collection() {
    let app = app_router(create_test_state().await, "/listings");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/listings/")
                .header("Authorization", bearer(TOKEN))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_trailing_slash_reaches_item() {
    let app = app_router(create_test_state().await, "/listings");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/listings/1/")
                .header("Authorization", bearer(TOKEN))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Routed to the item handler, which finds nothing.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_listings_route() {
    let state = create_test_state().await;
    let server = TestServer::new(build_router(state, "/api/v1/stays")).unwrap();

    server
        .post("/api/v1/stays")
        .add_header("Authorization", bearer(TOKEN))
        .json(&beach_house())
        .await
        .assert_status(StatusCode::CREATED);

    let list = server
        .get("/api/v1/stays")
        .add_header("Authorization", bearer(TOKEN))
        .await
        .json::<Vec<Value>>();
    assert_eq!(list.len(), 1);

    server
        .get("/listings")
        .add_header("Authorization", bearer(TOKEN))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_unsupported_method() {
    let server = TestServer::new(build_router(create_test_state().await, "/listings")).unwrap();

    server
        .delete("/listings")
        .add_header("Authorization", bearer(TOKEN))
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}
