mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_reports_live_count() {
    let app = common::memory_app();
    common::post_json(
        &app,
        "/api/games",
        &json!({ "title": "Celeste", "platform": "PC", "release_year": 2018, "price": 19.99 }),
    )
    .await;

    let (status, body) = common::get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    let json = common::json(&body);
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["total_games"], 1);
    assert_eq!(json["database"]["type"], "in-memory");
    assert_eq!(json["database"]["total_games"], 1);
    assert_eq!(json["server"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["timestamp"].as_str().unwrap_or_default().ends_with('Z'));
}

#[tokio::test]
async fn api_info_lists_routes_and_bodies() {
    let app = common::memory_app();

    let (status, body) = common::get(&app, "/api").await;

    assert_eq!(status, StatusCode::OK);
    let json = common::json(&body);
    assert_eq!(json["success"], true);
    let endpoints = json["endpoints"].as_array().cloned().unwrap_or_default();
    assert_eq!(endpoints.len(), 8);

    let create = endpoints
        .iter()
        .find(|e| e["method"] == "POST" && e["path"] == "/api/games")
        .cloned()
        .unwrap_or_default();
    for field in ["title", "platform", "release_year", "price", "completed", "playtime_hours"] {
        assert!(create["body"][field].is_string(), "missing {field}");
    }
}

#[tokio::test]
async fn root_welcome() {
    let app = common::memory_app();

    let (status, body) = common::get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let json = common::json(&body);
    assert_eq!(json["status"], "running");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_route_returns_404_envelope() {
    let app = common::memory_app();

    let (status, body) = common::get(&app, "/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json = common::json(&body);
    assert_eq!(json["success"], false);
    assert_eq!(
        json["message"],
        "The route GET /nonexistent was not found on this server"
    );
    let routes = json["availableRoutes"].as_array().cloned().unwrap_or_default();
    assert!(routes.contains(&json!("DELETE /api/games/:id")));
}

#[tokio::test]
async fn unsupported_method_returns_404_envelope() {
    let app = common::memory_app();

    let (status, body) = common::request(&app, "PATCH", "/api/games/1").await;

    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(common::json(&body)["success"], false);
}
