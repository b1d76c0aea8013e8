//! Connection pool setup. The SQLite file is created on first connect.

use crate::config::DatabaseConfig;
use crate::error::{AppError, ConfigError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Open the pool described by `config`, creating the database file if it does not exist.
/// Foreign keys are enforced on every connection.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| ConfigError::InvalidDatabaseUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    tracing::info!(url = %config.url, max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

/// Single-connection in-memory pool. Every connection to `:memory:` is a fresh database,
/// so the pool is pinned to one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}
