use axum::Json;
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::{Map, Value, json};

use super::timestamp;

/// One entry of the public route table.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    /// Accepted body fields and their shape; empty when the route takes no body.
    pub body: &'static [(&'static str, &'static str)],
}

/// Every route the API serves, in display order.
pub const ROUTES: &[Route] = &[
    Route {
        method: "GET",
        path: "/",
        description: "Welcome page",
        body: &[],
    },
    Route {
        method: "GET",
        path: "/api",
        description: "API information",
        body: &[],
    },
    Route {
        method: "GET",
        path: "/api/health",
        description: "Health check and server status",
        body: &[],
    },
    Route {
        method: "GET",
        path: "/api/games",
        description: "Get all games",
        body: &[],
    },
    Route {
        method: "GET",
        path: "/api/games/:id",
        description: "Get single game by ID",
        body: &[],
    },
    Route {
        method: "POST",
        path: "/api/games",
        description: "Create new game",
        body: &[
            ("title", "string (required, 1-255 characters)"),
            ("platform", "string (required, 1-100 characters)"),
            ("release_year", "integer (required, 1950 to current year + 2)"),
            ("price", "number (required, >= 0)"),
            ("completed", "boolean (optional, default false)"),
            ("playtime_hours", "number (optional, >= 0, default 0)"),
        ],
    },
    Route {
        method: "PUT",
        path: "/api/games/:id",
        description: "Update existing game",
        body: &[
            ("title", "string (optional, 1-255 characters)"),
            ("platform", "string (optional, 1-100 characters)"),
            ("release_year", "integer (optional, 1950 to current year + 2)"),
            ("price", "number (optional, >= 0)"),
            ("completed", "boolean (optional)"),
            ("playtime_hours", "number (optional, >= 0)"),
        ],
    },
    Route {
        method: "DELETE",
        path: "/api/games/:id",
        description: "Delete game by ID",
        body: &[],
    },
];

fn route_labels() -> Vec<String> {
    ROUTES
        .iter()
        .map(|route| format!("{} {}", route.method, route.path))
        .collect()
}

/// `GET /` — Welcome document.
pub async fn welcome() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Welcome to Game Collection API",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": "Visit /api for all available endpoints",
        "endpoints": route_labels(),
        "status": "running",
        "timestamp": timestamp(),
    }))
}

/// `GET /api` — Static catalogue of every endpoint and its body shape.
pub async fn api_info() -> impl IntoResponse {
    let endpoints: Vec<Value> = ROUTES
        .iter()
        .map(|route| {
            let mut endpoint = json!({
                "method": route.method,
                "path": route.path,
                "description": route.description,
            });
            if !route.body.is_empty() {
                let body: Map<String, Value> = route
                    .body
                    .iter()
                    .map(|(field, shape)| ((*field).to_string(), json!(shape)))
                    .collect();
                endpoint["body"] = Value::Object(body);
            }
            endpoint
        })
        .collect();

    Json(json!({
        "success": true,
        "message": "Game Collection API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "REST API for managing video game collection",
        "documentation": "All endpoints return JSON responses",
        "endpoints": endpoints,
        "timestamp": timestamp(),
    }))
}

/// Fallback for unknown routes and unsupported methods.
pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Route not found",
            "message": format!("The route {method} {uri} was not found on this server"),
            "availableRoutes": route_labels(),
            "timestamp": timestamp(),
        })),
    )
}
