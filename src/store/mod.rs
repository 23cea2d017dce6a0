//! Persistence of game records behind a backend-agnostic capability trait.
//!
//! Handlers only ever see `Arc<dyn GameStore>`; the concrete backend is picked once at
//! bootstrap from [`crate::config::StoreBackend`].

pub mod database;
pub mod document;
pub mod memory;
pub mod seed;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use database::DatabaseStore;
pub use document::DocumentStore;
pub use memory::MemoryStore;

/// Identifier assigned by a store.
///
/// Serializes as a JSON number for integer keys and as a string for `ObjectId` keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GameId {
    /// Sequential key of the in-memory and relational backends.
    Int(i32),
    /// 24-character hex `ObjectId` of the document backend.
    Object(String),
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Object(id) => f.write_str(id),
        }
    }
}

/// A persisted game record.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub title: String,
    pub platform: String,
    pub release_year: i32,
    pub price: f64,
    pub completed: bool,
    pub playtime_hours: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a game about to be created. Produced only by full validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub title: String,
    pub platform: String,
    pub release_year: i32,
    pub price: f64,
    pub completed: bool,
    pub playtime_hours: f64,
}

/// A partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameChanges {
    pub title: Option<String>,
    pub platform: Option<String>,
    pub release_year: Option<i32>,
    pub price: Option<f64>,
    pub completed: Option<bool>,
    pub playtime_hours: Option<f64>,
}

impl Game {
    /// Build the record for a freshly assigned id. Both timestamps are `now`.
    #[must_use]
    pub fn from_new(id: GameId, new: NewGame, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            platform: new.platform,
            release_year: new.release_year,
            price: new.price,
            completed: new.completed,
            playtime_hours: new.playtime_hours,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge `changes` over this record and refresh `updated_at`.
    pub fn apply(&mut self, changes: GameChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(platform) = changes.platform {
            self.platform = platform;
        }
        if let Some(release_year) = changes.release_year {
            self.release_year = release_year;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        if let Some(playtime_hours) = changes.playtime_hours {
            self.playtime_hours = playtime_hours;
        }
        self.updated_at = now.max(self.created_at);
    }
}

/// Failures a store can report. Matched exhaustively at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no game with id {0}")]
    NotFound(GameId),
    #[error("`{0}` is not a valid game id")]
    InvalidId(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(
                sea_orm::SqlErr::UniqueConstraintViolation(msg)
                | sea_orm::SqlErr::ForeignKeyConstraintViolation(msg),
            ) => Self::ConstraintViolation(msg),
            _ => Self::Backend(err.to_string()),
        }
    }
}

/// Parse a path segment into the integer key of the memory and relational backends.
///
/// The segment is taken verbatim; surrounding whitespace makes it invalid.
///
/// # Errors
///
/// Returns [`StoreError::InvalidId`] when `raw` is not a valid `i32`.
pub fn parse_int_id(raw: &str) -> Result<i32, StoreError> {
    raw.parse::<i32>()
        .map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Persistence contract for game records.
///
/// Every call is atomic with respect to other concurrent calls; callers do no locking.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Human-readable backend name, reported by the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Parse a client-supplied id into this backend's key, without touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`] when `raw` is not a key this backend can hold.
    fn parse_id(&self, raw: &str) -> Result<GameId, StoreError>;

    /// All games, newest first (ties broken by id, highest first).
    async fn list(&self) -> Result<Vec<Game>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn get(&self, id: &str) -> Result<Game, StoreError>;

    /// Persist a validated game, assigning its id and timestamps.
    async fn create(&self, game: NewGame) -> Result<Game, StoreError>;

    /// Merge `changes` into the stored game and return the result.
    async fn update(&self, id: &str, changes: GameChanges) -> Result<Game, StoreError>;

    /// Hard delete. `Ok(false)` when nothing had that id.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn sample() -> NewGame {
        NewGame {
            title: "Hades".to_string(),
            platform: "PC".to_string(),
            release_year: 2020,
            price: 24.99,
            completed: false,
            playtime_hours: 0.0,
        }
    }

    #[test]
    fn test_parse_int_id() {
        assert_eq!(parse_int_id("42").ok(), Some(42));
        assert_eq!(parse_int_id("007").ok(), Some(7));
        assert!(matches!(parse_int_id("abc"), Err(StoreError::InvalidId(raw)) if raw == "abc"));
        assert!(matches!(parse_int_id("99999999999"), Err(StoreError::InvalidId(_))));
    }

    #[test]
    fn test_parse_int_id_rejects_surrounding_whitespace() {
        for raw in [" 1", "1 ", "\t1", ""] {
            assert!(
                matches!(parse_int_id(raw), Err(StoreError::InvalidId(_))),
                "{raw:?} was accepted"
            );
        }
    }

    #[test]
    fn test_game_id_serializes_by_kind() {
        assert_eq!(serde_json::to_value(GameId::Int(7)).ok(), Some(serde_json::json!(7)));
        assert_eq!(
            serde_json::to_value(GameId::Object("65a1f0c2e4b0a1b2c3d4e5f6".into())).ok(),
            Some(serde_json::json!("65a1f0c2e4b0a1b2c3d4e5f6"))
        );
        assert_eq!(GameId::Int(7).to_string(), "7");
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let created = Utc::now();
        let mut game = Game::from_new(GameId::Int(1), sample(), created);
        let later = created + Duration::seconds(5);

        game.apply(
            GameChanges {
                price: Some(49.99),
                ..GameChanges::default()
            },
            later,
        );

        assert!((game.price - 49.99).abs() < f64::EPSILON);
        assert_eq!(game.title, "Hades");
        assert_eq!(game.platform, "PC");
        assert_eq!(game.release_year, 2020);
        assert!(!game.completed);
        assert_eq!(game.created_at, created);
        assert_eq!(game.updated_at, later);
    }

    #[test]
    fn test_apply_never_moves_updated_before_created() {
        let created = Utc::now();
        let mut game = Game::from_new(GameId::Int(1), sample(), created);

        game.apply(GameChanges::default(), created - Duration::seconds(60));

        assert_eq!(game.updated_at, created);
    }
}
