//! In-memory game store for local development and tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::{Game, GameChanges, GameId, GameStore, NewGame, StoreError, parse_int_id};

/// Games keyed by id in a concurrent map. Cloning shares the same collection.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    games: Arc<DashMap<i32, Game>>,
    next_id: Arc<AtomicI32>,
}

impl MemoryStore {
    /// Create an empty store; ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            games: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    fn parse_id(&self, raw: &str) -> Result<GameId, StoreError> {
        parse_int_id(raw).map(GameId::Int)
    }

    async fn list(&self) -> Result<Vec<Game>, StoreError> {
        let mut games: Vec<Game> = self.games.iter().map(|entry| entry.value().clone()).collect();
        games.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(games)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.games.len() as u64)
    }

    async fn get(&self, id: &str) -> Result<Game, StoreError> {
        let id = parse_int_id(id)?;
        self.games
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(GameId::Int(id)))
    }

    async fn create(&self, game: NewGame) -> Result<Game, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if id <= 0 {
            return Err(StoreError::Backend("game id space exhausted".to_string()));
        }

        let game = Game::from_new(GameId::Int(id), game, Utc::now());
        self.games.insert(id, game.clone());
        Ok(game)
    }

    async fn update(&self, id: &str, changes: GameChanges) -> Result<Game, StoreError> {
        let id = parse_int_id(id)?;
        // The shard stays write-locked for the whole merge
        let mut entry = self
            .games
            .get_mut(&id)
            .ok_or(StoreError::NotFound(GameId::Int(id)))?;
        entry.apply(changes, Utc::now());
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let id = parse_int_id(id)?;
        Ok(self.games.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
