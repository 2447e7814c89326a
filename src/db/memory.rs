//! In-memory game store.
//!
//! Used when no `DATABASE_URL` is configured and by tests. Ids start at 1 and
//! are never reused, matching a `BIGSERIAL` column. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{GameStore, StoreError};
use crate::state::{Game, GamePatch, NewGame};

#[derive(Default)]
struct Inner {
    last_id: i64,
    games: BTreeMap<i64, Game>,
}

/// `GameStore` holding records in a `BTreeMap` keyed by id.
#[derive(Default)]
pub struct MemoryGameStore {
    inner: RwLock<Inner>,
}

impl MemoryGameStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn insert(&self, game: NewGame, now: OffsetDateTime) -> Result<Game, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let game = game.into_game(inner.last_id, now);
        inner.games.insert(game.id, game.clone());
        Ok(game)
    }

    async fn fetch(&self, id: i64) -> Result<Option<Game>, StoreError> {
        Ok(self.inner.read().await.games.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Game>, StoreError> {
        Ok(self.inner.read().await.games.values().cloned().collect())
    }

    async fn list_by_console(&self, console: &str) -> Result<Vec<Game>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .games
            .values()
            .filter(|game| game.console == console)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, patch: GamePatch, now: OffsetDateTime) -> Result<Option<Game>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(game) = inner.games.get_mut(&id) else {
            return Ok(None);
        };
        game.apply(patch, now);
        Ok(Some(game.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.games.remove(&id).is_some())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
