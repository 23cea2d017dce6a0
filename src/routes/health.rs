use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;

use super::timestamp;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Serialize)]
struct HealthResponse {
    success: bool,
    status: &'static str,
    message: &'static str,
    total_games: u64,
    database: DatabaseHealth,
    server: ServerHealth,
    timestamp: String,
}

#[derive(Serialize)]
struct DatabaseHealth {
    #[serde(rename = "type")]
    kind: &'static str,
    status: &'static str,
    total_games: u64,
}

#[derive(Serialize)]
struct ServerHealth {
    uptime_seconds: u64,
    version: &'static str,
    environment: &'static str,
}

/// `GET /api/health` — Liveness plus a live count from the store.
///
/// A store fault answers 500 rather than tearing anything down.
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let expose_details = state.config.environment.exposes_error_details();
    let connection_failed = |err: StoreError| AppError::Internal {
        message: "Database connection failed".to_string(),
        details: expose_details.then(|| err.to_string()),
    };

    state.store.ping().await.map_err(connection_failed)?;
    let total_games = state.store.count().await.map_err(connection_failed)?;

    Ok(Json(HealthResponse {
        success: true,
        status: "healthy",
        message: "Game Collection API is running",
        total_games,
        database: DatabaseHealth {
            kind: state.store.backend_name(),
            status: "connected",
            total_games,
        },
        server: ServerHealth {
            uptime_seconds: state.started_at.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION"),
            environment: state.config.environment.as_str(),
        },
        timestamp: timestamp(),
    }))
}
