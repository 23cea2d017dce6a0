#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use tower::ServiceExt;

use game_collection_api::config::{Config, Environment, StoreBackend};
use game_collection_api::state::AppState;
use game_collection_api::store::{DatabaseStore, GameStore, MemoryStore};

/// Configuration for tests; nothing is read from the environment.
pub fn test_config(environment: Environment) -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment,
        log_level: "warn".to_string(),
        seed_sample_games: false,
    }
}

/// Build the app router around an arbitrary store.
pub fn app_with(store: Arc<dyn GameStore>, environment: Environment) -> Router {
    let state = AppState::new(store, test_config(environment));
    game_collection_api::routes::router().with_state(state)
}

/// Build the app router backed by an empty in-memory store.
pub fn memory_app() -> Router {
    app_with(Arc::new(MemoryStore::new()), Environment::Development)
}

/// Build the app router backed by an in-memory `SQLite` database with migrations.
pub async fn sqlite_app() -> Router {
    let db = game_collection_api::db::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    app_with(Arc::new(DatabaseStore::new(db)), Environment::Development)
}

/// Send a request and return (status, body).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();

    (status, body_str)
}

/// Test helper: send a body-less request with the given method.
pub async fn request(app: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();

    send(app, request).await
}

/// Test helper: send a GET request to the app and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    request(app, "GET", uri).await
}

/// Test helper: send a DELETE request.
pub async fn delete(app: &Router, uri: &str) -> (StatusCode, String) {
    request(app, "DELETE", uri).await
}

/// Test helper: send a raw string body as JSON.
pub async fn send_raw_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: &str,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_default();

    send(app, request).await
}

/// Test helper: POST a JSON value.
pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
    send_raw_json(app, "POST", uri, &body.to_string()).await
}

/// Test helper: PUT a JSON value.
pub async fn put_json(app: &Router, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
    send_raw_json(app, "PUT", uri, &body.to_string()).await
}

/// Parse a response body, yielding `Null` on malformed JSON.
pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or(serde_json::Value::Null)
}
