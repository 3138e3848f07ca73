//! Shared fixtures for integration tests against a mock document store.

#![allow(dead_code)]

use mediaboard::models::{Catalog, MemoryLikeLedger};
use mediaboard::{FeedRenderer, FeedStore, HttpDocumentStore};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Three posts whose key order differs from their timestamp order
pub fn posts_fixture() -> Value {
    json!({
        "-Na": {"username": "ana", "text": "five", "timestamp": 5, "likes": 2, "comments_count": 0},
        "-Nb": {"username": "bo", "text": "one", "timestamp": 1, "likes": 0, "comments_count": 0},
        "-Nc": {"username": "cy", "text": "nine", "timestamp": 9, "likes": 7, "comments_count": 1}
    })
}

/// Mount the feed query answering with `body`
pub async fn mount_posts(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/posts.json"))
        .and(query_param("orderBy", "\"timestamp\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Accept every counter write
pub async fn mount_counter_writes(server: &MockServer) {
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(0)))
        .mount(server)
        .await;
}

pub fn http_feed_store(server: &MockServer) -> FeedStore {
    let store = HttpDocumentStore::new(server.uri()).expect("valid mock server url");
    FeedStore::new(Arc::new(store))
}

pub fn http_feed(server: &MockServer) -> FeedRenderer {
    FeedRenderer::new(
        http_feed_store(server),
        Box::new(MemoryLikeLedger::new()),
        Arc::new(Catalog::default()),
    )
}
