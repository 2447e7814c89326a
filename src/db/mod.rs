//! Database initialization and the game store abstraction.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses `init_pool` to create the shared SQLx pool and enforce schema
//! migrations before accepting API traffic. Handlers only see `GameStore`;
//! `postgres` is the production backend and `memory` backs tests and
//! database-less runs.

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use time::OffsetDateTime;

use crate::config::DbConfig;
use crate::state::{Game, GamePatch, NewGame};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE class 22: data exception (bad encoding, out-of-range value).
const DATA_EXCEPTION_CLASS: &str = "22";
/// SQLSTATE class 23: integrity constraint violation.
const INTEGRITY_CLASS: &str = "23";

/// Initialize the `PostgreSQL` connection pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str, config: DbConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a `GameStore`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate record: {0}")]
    Conflict(String),

    /// The database rejected a client-supplied value or any other
    /// integrity constraint failed.
    #[error("{0}")]
    Rejected(String),

    /// Connection, protocol or query failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Classify data exceptions and integrity violations by SQLSTATE.
    /// `None` for anything else.
    fn from_sqlstate(code: &str, message: &str) -> Option<Self> {
        if code == UNIQUE_VIOLATION {
            Some(Self::Conflict(message.to_owned()))
        } else if code.starts_with(INTEGRITY_CLASS) || code.starts_with(DATA_EXCEPTION_CLASS) {
            Some(Self::Rejected(message.to_owned()))
        } else {
            None
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if let Some(classified) = db
                .code()
                .and_then(|code| Self::from_sqlstate(&code, db.message()))
            {
                return classified;
            }
        }
        Self::Database(err)
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Persistence seam for game records.
///
/// Every method is a single logical round trip; `update` must apply the patch
/// and write atomically with respect to other writers of the same row.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Insert a new record stamped `created = updated = now` and return it as stored.
    async fn insert(&self, game: NewGame, now: OffsetDateTime) -> Result<Game, StoreError>;

    /// Fetch one record. `Ok(None)` when no row has this id.
    async fn fetch(&self, id: i64) -> Result<Option<Game>, StoreError>;

    /// All records, ascending by id.
    async fn list(&self) -> Result<Vec<Game>, StoreError>;

    /// Records whose console equals `console` exactly, ascending by id.
    async fn list_by_console(&self, console: &str) -> Result<Vec<Game>, StoreError>;

    /// Merge `patch` into the stored record and return the result.
    /// `Ok(None)` when no row has this id.
    async fn update(&self, id: i64, patch: GamePatch, now: OffsetDateTime) -> Result<Option<Game>, StoreError>;

    /// Delete one record. `Ok(false)` when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
