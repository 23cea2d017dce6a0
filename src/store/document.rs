//! Document game store backed by `MongoDB`.
//!
//! Ids are `ObjectId`s, reported to clients as 24-character hex strings.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use super::{Game, GameChanges, GameId, GameStore, NewGame, StoreError};

const GAME_COLLECTION_NAME: &str = "games";
const DUPLICATE_KEY: i32 = 11000;

/// Game store over a `MongoDB` collection. Cloning shares the client's connection pool.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    client: Client,
    database: String,
    games: Collection<GameDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GameDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    platform: String,
    release_year: i32,
    price: f64,
    completed: bool,
    playtime_hours: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl From<GameDocument> for Game {
    fn from(doc: GameDocument) -> Self {
        Self {
            id: GameId::Object(doc.id.to_hex()),
            title: doc.title,
            platform: doc.platform,
            release_year: doc.release_year,
            price: doc.price,
            completed: doc.completed,
            playtime_hours: doc.playtime_hours,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(failure))
                if failure.code == DUPLICATE_KEY =>
            {
                Self::ConstraintViolation(failure.message.clone())
            }
            _ => Self::Backend(err.to_string()),
        }
    }
}

impl DocumentStore {
    /// Build a store over `database` using an existing client.
    #[must_use]
    pub fn new(client: Client, database: &str) -> Self {
        let games = client.database(database).collection(GAME_COLLECTION_NAME);
        Self {
            client,
            database: database.to_string(),
            games,
        }
    }

    /// Parse `uri` and open a client. The driver connects lazily, so use
    /// [`GameStore::ping`] to check reachability.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the URI is malformed or cannot be resolved.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(options)?;
        Ok(Self::new(client, database))
    }

    /// Create the index backing newest-first listing. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the server is unreachable.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "created_at": -1, "_id": -1 })
            .build();
        self.games.create_index(index).await?;
        Ok(())
    }
}

fn object_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// `MongoDB` keeps millisecond precision; truncate up front so returned records match stored ones.
fn now_millis() -> DateTime<Utc> {
    bson::DateTime::from_chrono(Utc::now()).to_chrono()
}

/// Update operators for `changes`. `$max` keeps `updated_at` from moving backwards.
fn update_document(changes: GameChanges, now: DateTime<Utc>) -> Document {
    let mut set = Document::new();
    if let Some(title) = changes.title {
        set.insert("title", title);
    }
    if let Some(platform) = changes.platform {
        set.insert("platform", platform);
    }
    if let Some(release_year) = changes.release_year {
        set.insert("release_year", release_year);
    }
    if let Some(price) = changes.price {
        set.insert("price", price);
    }
    if let Some(completed) = changes.completed {
        set.insert("completed", completed);
    }
    if let Some(playtime_hours) = changes.playtime_hours {
        set.insert("playtime_hours", playtime_hours);
    }

    let mut update = doc! {
        "$max": { "updated_at": bson::DateTime::from_chrono(now) },
    };
    if !set.is_empty() {
        update.insert("$set", set);
    }
    update
}

#[async_trait]
impl GameStore for DocumentStore {
    fn backend_name(&self) -> &'static str {
        "MongoDB"
    }

    fn parse_id(&self, raw: &str) -> Result<GameId, StoreError> {
        object_id(raw).map(|oid| GameId::Object(oid.to_hex()))
    }

    async fn list(&self) -> Result<Vec<Game>, StoreError> {
        let games: Vec<GameDocument> = self
            .games
            .find(doc! {})
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(games.into_iter().map(Game::from).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.games.count_documents(doc! {}).await?)
    }

    async fn get(&self, id: &str) -> Result<Game, StoreError> {
        let oid = object_id(id)?;
        self.games
            .find_one(doc! { "_id": oid })
            .await?
            .map(Game::from)
            .ok_or_else(|| StoreError::NotFound(GameId::Object(oid.to_hex())))
    }

    async fn create(&self, new: NewGame) -> Result<Game, StoreError> {
        let now = now_millis();
        let record = GameDocument {
            id: ObjectId::new(),
            title: new.title,
            platform: new.platform,
            release_year: new.release_year,
            price: new.price,
            completed: new.completed,
            playtime_hours: new.playtime_hours,
            created_at: now,
            updated_at: now,
        };

        self.games.insert_one(&record).await?;
        Ok(record.into())
    }

    async fn update(&self, id: &str, changes: GameChanges) -> Result<Game, StoreError> {
        let oid = object_id(id)?;
        // Single-document updates are atomic on the server
        self.games
            .find_one_and_update(doc! { "_id": oid }, update_document(changes, now_millis()))
            .return_document(ReturnDocument::After)
            .await?
            .map(Game::from)
            .ok_or_else(|| StoreError::NotFound(GameId::Object(oid.to_hex())))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let oid = object_id(id)?;
        let result = self.games.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const HEX: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    /// The driver only dials out on the first operation, so id checks need no server.
    async fn offline_store() -> Option<DocumentStore> {
        let client = Client::with_uri_str("mongodb://127.0.0.1:27017").await.ok()?;
        Some(DocumentStore::new(client, "game_collection_test"))
    }

    #[test]
    fn object_ids_must_be_24_hex_chars() {
        assert_eq!(object_id(HEX).map(|oid| oid.to_hex()).ok().as_deref(), Some(HEX));

        for raw in [
            "42",
            "not-an-object-id",
            " 65a1f0c2e4b0a1b2c3d4e5f6",
            "65a1f0c2e4b0a1b2c3d4e5fz",
        ] {
            assert!(
                matches!(object_id(raw), Err(StoreError::InvalidId(r)) if r == raw),
                "{raw:?} was accepted"
            );
        }
    }

    #[test]
    fn documents_become_games_with_hex_ids() {
        let created = Utc
            .with_ymd_and_hms(2024, 1, 12, 9, 30, 0)
            .single()
            .unwrap_or_default();
        let Ok(id) = ObjectId::parse_str(HEX) else {
            unreachable!("HEX is a valid ObjectId");
        };

        let game = Game::from(GameDocument {
            id,
            title: "Celeste".to_string(),
            platform: "PC".to_string(),
            release_year: 2018,
            price: 19.99,
            completed: true,
            playtime_hours: 12.5,
            created_at: created,
            updated_at: created,
        });

        assert_eq!(game.id, GameId::Object(HEX.to_string()));
        assert_eq!(game.title, "Celeste");
        assert!(game.completed);
        assert_eq!(game.created_at, game.updated_at);
    }

    #[test]
    fn update_sets_only_supplied_fields() {
        let now = now_millis();
        let update = update_document(
            GameChanges {
                price: Some(4.99),
                completed: Some(true),
                ..GameChanges::default()
            },
            now,
        );

        assert_eq!(
            update,
            doc! {
                "$max": { "updated_at": bson::DateTime::from_chrono(now) },
                "$set": { "price": 4.99, "completed": true },
            }
        );
    }

    #[test]
    fn empty_update_only_touches_the_timestamp() {
        let update = update_document(GameChanges::default(), now_millis());

        assert!(update.contains_key("$max"));
        assert!(!update.contains_key("$set"));
    }

    #[test]
    fn timestamps_are_truncated_to_milliseconds() {
        assert_eq!(now_millis().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected_before_any_query() {
        let Some(store) = offline_store().await else {
            unreachable!("a literal mongodb:// URI always parses");
        };

        assert_eq!(store.backend_name(), "MongoDB");
        assert!(matches!(store.get("42").await, Err(StoreError::InvalidId(_))));
        assert!(matches!(
            store.update("42", GameChanges::default()).await,
            Err(StoreError::InvalidId(_))
        ));
        assert!(matches!(store.delete("abc").await, Err(StoreError::InvalidId(_))));
        assert_eq!(
            store.parse_id(HEX).ok(),
            Some(GameId::Object(HEX.to_string()))
        );
    }
}
