use std::sync::{Mutex, MutexGuard, PoisonError};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests in this module that touch process environment.
fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Caller must hold `env_lock()`.
unsafe fn clear_app_env() {
    unsafe {
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("BIND_ADDR");
        std::env::remove_var("PORT");
        std::env::remove_var("DB_MAX_CONNECTIONS");
        std::env::remove_var("DB_ACQUIRE_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_defaults() {
    let _guard = env_lock();
    unsafe { clear_app_env() };

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.database_url, None);
    assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.db, DbConfig::default());
    assert_eq!(cfg.listen_addr(), "0.0.0.0:3000");
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_lock();
    unsafe {
        clear_app_env();
        std::env::set_var("DATABASE_URL", "postgres://games:games@db:5432/games");
        std::env::set_var("BIND_ADDR", "127.0.0.1");
        std::env::set_var("PORT", "8080");
        std::env::set_var("DB_MAX_CONNECTIONS", "12");
        std::env::set_var("DB_ACQUIRE_TIMEOUT_SECS", "2");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://games:games@db:5432/games"));
    assert_eq!(cfg.listen_addr(), "127.0.0.1:8080");
    assert_eq!(cfg.db, DbConfig { max_connections: 12, acquire_timeout_secs: 2 });

    unsafe { clear_app_env() };
}

#[test]
fn from_env_blank_database_url_means_memory() {
    let _guard = env_lock();
    unsafe {
        clear_app_env();
        std::env::set_var("DATABASE_URL", "  ");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert!(cfg.database_url.is_none());

    unsafe { clear_app_env() };
}

#[test]
fn from_env_invalid_port_errors() {
    let _guard = env_lock();
    unsafe {
        clear_app_env();
        std::env::set_var("PORT", "eighty");
    }

    let err = AppConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("invalid PORT: eighty"));

    unsafe { clear_app_env() };
}

#[test]
fn from_env_unparsable_pool_settings_fall_back_to_defaults() {
    let _guard = env_lock();
    unsafe {
        clear_app_env();
        std::env::set_var("DB_MAX_CONNECTIONS", "lots");
        std::env::set_var("DB_ACQUIRE_TIMEOUT_SECS", "-1");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.db, DbConfig::default());

    unsafe { clear_app_env() };
}
