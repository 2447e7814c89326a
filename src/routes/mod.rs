//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the `/games` REST endpoints and the health probe under a
//! single Axum router, with permissive CORS and per-request trace spans.

pub mod games;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/games", get(games::list_games).post(games::create_game))
        .route("/games/console/{console}", get(games::list_games_by_console))
        .route(
            "/games/{id}",
            get(games::get_game)
                .put(games::update_game)
                .patch(games::update_game)
                .delete(games::delete_game),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
