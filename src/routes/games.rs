//! Game REST routes.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::error;

use crate::db::StoreError;
use crate::services::game::{self, GameError};
use crate::state::{AppState, Game};

const INTERNAL_ERROR_MESSAGE: &str = "internal storage error";

/// Error envelope returned with every non-2xx status.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub(crate) fn game_error_to_status(err: &GameError) -> StatusCode {
    match err {
        GameError::InvalidBody(_) | GameError::Store(StoreError::Rejected(_)) => StatusCode::BAD_REQUEST,
        GameError::NotFound(_) => StatusCode::NOT_FOUND,
        GameError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
        GameError::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn game_error_message(err: &GameError) -> String {
    match err {
        GameError::Store(StoreError::Rejected(msg)) => format!("unable to write to database: {msg}"),
        GameError::Store(StoreError::Database(_)) => INTERNAL_ERROR_MESSAGE.to_owned(),
        other => other.to_string(),
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = game_error_to_status(&self);
        if status.is_server_error() {
            error!(error = %self, "game request failed");
        }
        (status, Json(ErrorBody { error: game_error_message(&self) })).into_response()
    }
}

/// `POST /games` — create a game.
pub async fn create_game(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Game>), GameError> {
    let game = game::create_game(state.games.as_ref(), &body).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// `GET /games` — list all games in id order.
pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, GameError> {
    Ok(Json(game::list_games(state.games.as_ref()).await?))
}

/// `GET /games/console/:console` — list games for one console.
pub async fn list_games_by_console(
    State(state): State<AppState>,
    Path(console): Path<String>,
) -> Result<Json<Vec<Game>>, GameError> {
    Ok(Json(game::list_games_by_console(state.games.as_ref(), &console).await?))
}

/// `GET /games/:id` — fetch one game.
pub async fn get_game(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Game>, GameError> {
    let id = game::parse_game_id(&id)?;
    Ok(Json(game::get_game(state.games.as_ref(), id).await?))
}

/// `PUT /games/:id` and `PATCH /games/:id` — merge the body over a game.
pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Game>, GameError> {
    let id = game::parse_game_id(&id)?;
    Ok(Json(game::update_game(state.games.as_ref(), id, &body).await?))
}

/// `DELETE /games/:id` — delete a game.
pub async fn delete_game(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, GameError> {
    let id = game::parse_game_id(&id)?;
    game::delete_game(state.games.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "games_test.rs"]
mod tests;
