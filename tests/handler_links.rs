mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use snaplink::api::handlers::list_links_handler;
use snaplink::domain::entities::LinkRecord;
use snaplink::domain::repositories::DurableStore;
use snaplink::infrastructure::cache::NullCache;
use std::sync::Arc;

fn links_app(state: snaplink::AppState) -> Router {
    Router::new()
        .route("/urls", get(list_links_handler))
        .with_state(state)
}

async fn seed(store: &snaplink::infrastructure::persistence::MemoryLinkStore, count: i64) {
    let base = chrono::Utc::now();
    for i in 0..count {
        store
            .put(LinkRecord::from_parts(
                format!("id{:04}", i),
                format!("https://example.com/{}", i),
                base + chrono::Duration::seconds(i),
                0,
            ))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_list_links_empty() {
    let (state, _rx, _store) = common::create_test_state();
    let server = TestServer::new(links_app(state)).unwrap();

    let response = server.get("/urls").await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>(), serde_json::json!([]));
}

#[tokio::test]
async fn test_list_links_newest_first_camel_case() {
    let (state, _rx, store) = common::create_test_state();
    seed(&store, 3).await;
    let server = TestServer::new(links_app(state)).unwrap();

    let json = server.get("/urls").await.json::<serde_json::Value>();
    let items = json.as_array().unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["identifier"], "id0002");
    assert_eq!(items[0]["targetUrl"], "https://example.com/2");
    assert_eq!(items[0]["clickCount"], 0);
    assert!(items[0]["createdAt"].is_string());
    assert_eq!(items[2]["identifier"], "id0000");
}

#[tokio::test]
async fn test_list_links_pagination() {
    let (state, _rx, store) = common::create_test_state();
    seed(&store, 5).await;
    let server = TestServer::new(links_app(state)).unwrap();

    let json = server
        .get("/urls")
        .add_query_param("page", 2)
        .add_query_param("page_size", 2)
        .await
        .json::<serde_json::Value>();
    let items = json.as_array().unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["identifier"], "id0002");
    assert_eq!(items[1]["identifier"], "id0001");
}

#[tokio::test]
async fn test_list_links_invalid_pagination() {
    let (state, _rx, _store) = common::create_test_state();
    let server = TestServer::new(links_app(state)).unwrap();

    let response = server.get("/urls").add_query_param("page", 0).await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<serde_json::Value>()["error"], "BadRequest");

    server
        .get("/urls")
        .add_query_param("page_size", 5000)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_list_links_store_unavailable() {
    let (state, _rx) = common::create_test_state_with(
        Arc::new(common::UnavailableStore),
        Arc::new(NullCache::new()),
        100,
    );
    let server = TestServer::new(links_app(state)).unwrap();

    server
        .get("/urls")
        .await
        .assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}
