mod games;
mod health;
mod info;

use axum::Router;
use axum::routing::get;
use chrono::{DateTime, SecondsFormat, Utc};

pub use info::{ROUTES, Route};

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /` — welcome document
/// - `GET /api` — endpoint catalogue
/// - `GET /api/health` — liveness plus store reachability
/// - `/api/games` — collection CRUD
///
/// Anything else, including a known path with an unsupported method, gets the 404 envelope.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(info::welcome))
        .route("/api", get(info::api_info))
        .route("/api/health", get(health::health_check))
        .merge(games::router())
        .fallback(info::not_found)
        .method_not_allowed_fallback(info::not_found)
}

/// Render an instant as ISO-8601 in UTC with millisecond precision.
#[must_use]
pub fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The current instant, formatted for response envelopes.
#[must_use]
pub fn timestamp() -> String {
    iso8601(Utc::now())
}
