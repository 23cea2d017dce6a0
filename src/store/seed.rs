//! Sample games inserted into an empty collection at startup.

use super::{GameStore, NewGame, StoreError};

/// The starter collection.
#[must_use]
pub fn sample_games() -> Vec<NewGame> {
    vec![
        NewGame {
            title: "The Legend of Zelda: Breath of the Wild".to_string(),
            platform: "Nintendo Switch".to_string(),
            release_year: 2017,
            price: 59.99,
            completed: true,
            playtime_hours: 85.0,
        },
        NewGame {
            title: "Elden Ring".to_string(),
            platform: "PlayStation 5".to_string(),
            release_year: 2022,
            price: 69.99,
            completed: false,
            playtime_hours: 42.0,
        },
        NewGame {
            title: "Minecraft".to_string(),
            platform: "PC".to_string(),
            release_year: 2011,
            price: 26.95,
            completed: true,
            playtime_hours: 156.0,
        },
    ]
}

/// Insert [`sample_games`] when the store holds no games. Returns how many were inserted.
///
/// # Errors
///
/// Propagates any store failure.
pub async fn seed_if_empty(store: &dyn GameStore) -> Result<usize, StoreError> {
    if store.count().await? > 0 {
        return Ok(0);
    }

    let games = sample_games();
    let inserted = games.len();
    for game in games {
        store.create(game).await?;
    }

    tracing::info!(inserted, "Seeded sample games");
    Ok(inserted)
}
