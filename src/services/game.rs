//! Game service — create, read, update and delete game records.
//!
//! DESIGN
//! ======
//! Each operation is one request's worth of work against a `GameStore`:
//! decode the body, run one or two store calls, hand back a `Game`. Nothing
//! is cached between calls.
//!
//! ERROR HANDLING
//! ==============
//! Update checks existence before decoding the body, so a missing game is
//! reported as not-found even when the body is also malformed. The final
//! write re-checks existence inside the store; a game deleted in between is
//! reported as not-found rather than silently echoed back.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::db::{GameStore, StoreError};
use crate::state::{Game, GamePatch, NewGame, now_micros};

pub const CREATE_BODY_ERROR: &str = "unable to create game, please check your data";
pub const UPDATE_BODY_ERROR: &str = "bad JSON data, please check the update data";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{0}")]
    InvalidBody(&'static str),
    #[error("game not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// DECODING
// =============================================================================

/// Parse a path id. Anything that is not an integer cannot name a stored
/// game, so it is reported as not-found.
///
/// # Errors
///
/// Returns `NotFound` if `raw` is not a base-10 `i64`.
pub fn parse_game_id(raw: &str) -> Result<i64, GameError> {
    raw.parse::<i64>()
        .map_err(|_| GameError::NotFound(raw.to_owned()))
}

/// Decode a body that must be a JSON object. A bare `null` decodes to the
/// empty payload, leaving every field at its default.
fn decode_object<T: DeserializeOwned + Default>(body: &[u8], message: &'static str) -> Result<T, GameError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Ok(T::default()),
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).map_err(|_| GameError::InvalidBody(message)),
        _ => Err(GameError::InvalidBody(message)),
    }
}

/// Decode a create body.
///
/// # Errors
///
/// Returns `InvalidBody` if the body is neither `null` nor a JSON object of
/// the right shape.
pub fn decode_new_game(body: &[u8]) -> Result<NewGame, GameError> {
    decode_object(body, CREATE_BODY_ERROR)
}

/// Decode an update body.
///
/// # Errors
///
/// Returns `InvalidBody` if the body is neither `null` nor a JSON object of
/// the right shape.
pub fn decode_patch(body: &[u8]) -> Result<GamePatch, GameError> {
    decode_object(body, UPDATE_BODY_ERROR)
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create a game from a raw JSON body and return the stored record.
///
/// # Errors
///
/// Returns `InvalidBody` for a malformed body, or the store's error.
pub async fn create_game(store: &dyn GameStore, body: &[u8]) -> Result<Game, GameError> {
    let new_game = decode_new_game(body)?;
    let game = store.insert(new_game, now_micros()).await?;
    info!(id = game.id, title = %game.title, console = %game.console, "game created");
    Ok(game)
}

/// Fetch one game.
///
/// # Errors
///
/// Returns `NotFound` if no game has this id, or the store's error.
pub async fn get_game(store: &dyn GameStore, id: i64) -> Result<Game, GameError> {
    store
        .fetch(id)
        .await?
        .ok_or_else(|| GameError::NotFound(id.to_string()))
}

/// List every game, ascending by id.
///
/// # Errors
///
/// Returns the store's error if the query fails.
pub async fn list_games(store: &dyn GameStore) -> Result<Vec<Game>, GameError> {
    Ok(store.list().await?)
}

/// List games whose console equals `console` exactly, ascending by id.
///
/// # Errors
///
/// Returns the store's error if the query fails.
pub async fn list_games_by_console(store: &dyn GameStore, console: &str) -> Result<Vec<Game>, GameError> {
    Ok(store.list_by_console(console).await?)
}

/// Merge a raw JSON body over an existing game.
///
/// # Errors
///
/// Returns `NotFound` if the game does not exist (checked before and during
/// the write), `InvalidBody` for a malformed body, or the store's error.
pub async fn update_game(store: &dyn GameStore, id: i64, body: &[u8]) -> Result<Game, GameError> {
    get_game(store, id).await?;
    let patch = decode_patch(body)?;

    let game = store
        .update(id, patch, now_micros())
        .await?
        .ok_or_else(|| GameError::NotFound(id.to_string()))?;

    info!(id, "game updated");
    Ok(game)
}

/// Delete one game.
///
/// # Errors
///
/// Returns `NotFound` if no row was deleted, or the store's error.
pub async fn delete_game(store: &dyn GameStore, id: i64) -> Result<(), GameError> {
    if !store.delete(id).await? {
        return Err(GameError::NotFound(id.to_string()));
    }
    info!(id, "game deleted");
    Ok(())
}

#[cfg(test)]
#[path = "game_test.rs"]
mod tests;
