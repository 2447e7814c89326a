mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::db::GameStore;
use crate::db::memory::MemoryGameStore;
use crate::db::postgres::PgGameStore;

#[tokio::main]
async fn main() {
    // A missing .env file is the normal case in production.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let games: Arc<dyn GameStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::init_pool(database_url, config.db)
                .await
                .expect("database init failed");
            Arc::new(PgGameStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory game store");
            Arc::new(MemoryGameStore::new())
        }
    };

    let state = state::AppState::new(games);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .expect("failed to bind");

    tracing::info!(addr = %config.listen_addr(), "gamevault listening");
    axum::serve(listener, app).await.expect("server failed");
}
