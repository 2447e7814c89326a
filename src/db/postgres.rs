//! PostgreSQL game store.
//!
//! DESIGN
//! ======
//! Inserts use `RETURNING` so the response carries the canonical stored row
//! without a second round trip. Updates lock the row (`SELECT ... FOR UPDATE`)
//! inside a transaction, merge the patch in Rust, and write it back before
//! committing, which closes the read-modify-write race between concurrent
//! updates of the same game.

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;

use super::{GameStore, StoreError};
use crate::state::{Game, GamePatch, NewGame};

type GameRow = (i64, String, String, f64, bool, OffsetDateTime, OffsetDateTime);

fn game_from_row(row: GameRow) -> Game {
    let (id, title, console, rating, complete, created, updated) = row;
    Game { id, title, console, rating, complete, created, updated }
}

/// `GameStore` backed by the `games` table.
#[derive(Clone)]
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn insert(&self, game: NewGame, now: OffsetDateTime) -> Result<Game, StoreError> {
        let row = sqlx::query_as::<_, GameRow>(
            "INSERT INTO games (title, console, rating, complete, created, updated)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING id, title, console, rating, complete, created, updated",
        )
        .bind(&game.title)
        .bind(&game.console)
        .bind(game.rating)
        .bind(game.complete)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(game_from_row(row))
    }

    async fn fetch(&self, id: i64) -> Result<Option<Game>, StoreError> {
        let row = sqlx::query_as::<_, GameRow>(
            "SELECT id, title, console, rating, complete, created, updated
             FROM games WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(game_from_row))
    }

    async fn list(&self) -> Result<Vec<Game>, StoreError> {
        let rows = sqlx::query_as::<_, GameRow>(
            "SELECT id, title, console, rating, complete, created, updated
             FROM games ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(game_from_row).collect())
    }

    async fn list_by_console(&self, console: &str) -> Result<Vec<Game>, StoreError> {
        let rows = sqlx::query_as::<_, GameRow>(
            "SELECT id, title, console, rating, complete, created, updated
             FROM games WHERE console = $1 ORDER BY id",
        )
        .bind(console)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(game_from_row).collect())
    }

    async fn update(&self, id: i64, patch: GamePatch, now: OffsetDateTime) -> Result<Option<Game>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, GameRow>(
            "SELECT id, title, console, rating, complete, created, updated
             FROM games WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(tx.as_mut())
        .await?;

        // `tx` rolls back on drop.
        let Some(row) = row else {
            debug!(%id, "update target vanished before lock");
            return Ok(None);
        };

        let mut game = game_from_row(row);
        game.apply(patch, now);

        sqlx::query(
            "UPDATE games
             SET title = $2, console = $3, rating = $4, complete = $5, updated = $6
             WHERE id = $1",
        )
        .bind(game.id)
        .bind(&game.title)
        .bind(&game.console)
        .bind(game.rating)
        .bind(game.complete)
        .bind(game.updated)
        .execute(tx.as_mut())
        .await?;

        tx.commit().await?;
        Ok(Some(game))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
