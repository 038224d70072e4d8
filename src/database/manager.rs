use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the drink store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Query error: {0}")]
    QueryError(#[source] sqlx::Error),

    #[error("Write error: {0}")]
    WriteError(#[source] sqlx::Error),

    #[error("Stored recipe for drink {id} is not valid JSON: {source}")]
    CorruptRecipe {
        id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("Recipe could not be encoded: {0}")]
    EncodeError(#[from] serde_json::Error),
}

const CREATE_DRINK_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drink (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        recipe TEXT NOT NULL
    )
"#;

const SEED_RECIPE: &str = r#"[{"name": "water", "color": "blue", "parts": 1}]"#;

/// Owns pool construction and table bootstrap for the drink store.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Opens the configured database and makes sure the drink table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await
            .map_err(DatabaseError::ConnectionError)?;

        Self::create_tables(&pool).await?;
        info!("Connected to drink store at {}", config.url);
        Ok(pool)
    }

    /// Private in-memory database. A single connection that never expires keeps
    /// the data alive for the lifetime of the pool.
    pub async fn connect_in_memory() -> Result<SqlitePool, DatabaseError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(DatabaseError::ConnectionError)?;

        Self::create_tables(&pool).await?;
        Ok(pool)
    }

    pub async fn create_tables(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_DRINK_TABLE)
            .execute(pool)
            .await
            .map_err(DatabaseError::QueryError)?;
        Ok(())
    }

    /// Drops every drink and recreates the table with a single seed row.
    pub async fn reset(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS drink")
            .execute(pool)
            .await
            .map_err(DatabaseError::WriteError)?;
        Self::create_tables(pool).await?;
        sqlx::query("INSERT INTO drink (title, recipe) VALUES (?, ?)")
            .bind("water")
            .bind(SEED_RECIPE)
            .execute(pool)
            .await
            .map_err(DatabaseError::WriteError)?;

        info!("Drink table reset with seed data");
        Ok(())
    }

    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(DatabaseError::ConnectionError)?;
        Ok(())
    }
}
