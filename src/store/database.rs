//! Relational game store backed by `SeaORM`.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryOrder, TransactionTrait,
};

use super::{Game, GameChanges, GameId, GameStore, NewGame, StoreError, parse_int_id};
use crate::entities::game;

/// Game store over a pooled database connection (`PostgreSQL` or `SQLite`).
///
/// The schema is owned by the `migration` crate and must be applied before use.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn timestamp(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    now.into()
}

#[async_trait]
impl GameStore for DatabaseStore {
    fn backend_name(&self) -> &'static str {
        match self.db.get_database_backend() {
            DatabaseBackend::Postgres => "PostgreSQL",
            DatabaseBackend::Sqlite => "SQLite",
            DatabaseBackend::MySql => "MySQL",
        }
    }

    fn parse_id(&self, raw: &str) -> Result<GameId, StoreError> {
        parse_int_id(raw).map(GameId::Int)
    }

    async fn list(&self) -> Result<Vec<Game>, StoreError> {
        let games = game::Entity::find()
            .order_by_desc(game::Column::CreatedAt)
            .order_by_desc(game::Column::Id)
            .all(&self.db)
            .await?;

        Ok(games.into_iter().map(Game::from).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(game::Entity::find().count(&self.db).await?)
    }

    async fn get(&self, id: &str) -> Result<Game, StoreError> {
        let id = parse_int_id(id)?;
        game::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Game::from)
            .ok_or(StoreError::NotFound(GameId::Int(id)))
    }

    async fn create(&self, new: NewGame) -> Result<Game, StoreError> {
        let now = timestamp(Utc::now());

        let model = game::ActiveModel {
            title: Set(new.title),
            platform: Set(new.platform),
            release_year: Set(new.release_year),
            price: Set(new.price),
            completed: Set(new.completed),
            playtime_hours: Set(new.playtime_hours),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = model.insert(&self.db).await?;
        Ok(model.into())
    }

    async fn update(&self, id: &str, changes: GameChanges) -> Result<Game, StoreError> {
        let id = parse_int_id(id)?;
        let txn = self.db.begin().await?;

        let existing = game::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound(GameId::Int(id)))?;

        let updated_at = timestamp(Utc::now()).max(existing.created_at);
        let mut active: game::ActiveModel = existing.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(platform) = changes.platform {
            active.platform = Set(platform);
        }
        if let Some(release_year) = changes.release_year {
            active.release_year = Set(release_year);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(completed) = changes.completed {
            active.completed = Set(completed);
        }
        if let Some(playtime_hours) = changes.playtime_hours {
            active.playtime_hours = Set(playtime_hours);
        }
        active.updated_at = Set(updated_at);

        let model = match active.update(&txn).await {
            Ok(model) => model,
            Err(sea_orm::DbErr::RecordNotUpdated) => {
                return Err(StoreError::NotFound(GameId::Int(id)));
            }
            Err(err) => return Err(err.into()),
        };
        txn.commit().await?;

        Ok(model.into())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let id = parse_int_id(id)?;
        let result = game::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await.map_err(StoreError::from)
    }
}
