use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use super::{iso8601, timestamp};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::{Game, GameId};
use crate::validation;

/// Game collection router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/games", get(list_games).post(create_game))
        .route(
            "/api/games/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GameResponse {
    id: GameId,
    title: String,
    platform: String,
    release_year: i32,
    price: f64,
    completed: bool,
    playtime_hours: f64,
    created_at: String,
    updated_at: String,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            title: game.title,
            platform: game.platform,
            release_year: game.release_year,
            price: game.price,
            completed: game.completed,
            playtime_hours: game.playtime_hours,
            created_at: iso8601(game.created_at),
            updated_at: iso8601(game.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
struct DataResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    timestamp: String,
}

impl<T> DataResponse<T> {
    fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            count: None,
            timestamp: timestamp(),
        }
    }

    fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

#[derive(Debug, Serialize)]
struct DeletedResponse {
    success: bool,
    message: &'static str,
    deleted_id: GameId,
    timestamp: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/games` — Every game, newest first.
async fn list_games(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let games = state
        .store
        .list()
        .await
        .map_err(state.reject("Failed to retrieve games"))?;

    let mut response =
        DataResponse::new(games.into_iter().map(GameResponse::from).collect::<Vec<_>>());
    response.count = Some(response.data.len());

    Ok(Json(response))
}

/// `GET /api/games/{id}` — A single game.
async fn get_game(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let game = state
        .store
        .get(&id)
        .await
        .map_err(state.reject("Failed to retrieve game"))?;

    Ok(Json(DataResponse::new(GameResponse::from(game))))
}

/// `POST /api/games` — Validate the full payload and add the game.
async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(payload)?;
    let new_game = validation::validate_new_game(&body).map_err(AppError::Validation)?;

    let game = state
        .store
        .create(new_game)
        .await
        .map_err(state.reject("Failed to create game"))?;

    tracing::debug!(game_id = %game.id, "Game created");

    let response =
        DataResponse::new(GameResponse::from(game)).with_message("Game created successfully");

    Ok((StatusCode::CREATED, Json(response)))
}

/// `PUT /api/games/{id}` — Validate the supplied fields and merge them into the game.
async fn update_game(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let body = json_body(payload)?;
    let changes = validation::validate_changes(&body).map_err(AppError::Validation)?;

    let game = state
        .store
        .update(&id, changes)
        .await
        .map_err(state.reject("Failed to update game"))?;

    Ok(Json(
        DataResponse::new(GameResponse::from(game)).with_message("Game updated successfully"),
    ))
}

/// `DELETE /api/games/{id}` — Remove the game.
async fn delete_game(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let raw = path_id(path)?;
    let id = state
        .store
        .parse_id(&raw)
        .map_err(state.reject("Failed to delete game"))?;

    let removed = state
        .store
        .delete(&raw)
        .await
        .map_err(state.reject("Failed to delete game"))?;

    if !removed {
        return Err(AppError::NotFound(format!("Game not found with ID: {id}")));
    }

    tracing::debug!(game_id = %id, "Game deleted");

    Ok(Json(DeletedResponse {
        success: true,
        message: "Game deleted successfully",
        deleted_id: id,
        timestamp: timestamp(),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    })
}

/// Segments axum cannot decode (e.g. invalid UTF-8) are malformed ids.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        AppError::BadRequest(format!("Invalid game ID format: {}", rejection.body_text()))
    })
}
