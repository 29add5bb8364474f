use crate::core::{AppError, Result};
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:cajero.db?mode=rwc".to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration("Invalid DATABASE_MAX_CONNECTIONS".to_string())
                })?,
        })
    }

    /// Create a SQLite connection pool.
    ///
    /// Foreign key enforcement is off by default in SQLite; the delete
    /// guards on catalogs and clients rely on it being enabled.
    pub async fn create_pool(&self) -> Result<SqlitePool> {
        let options = SqliteConnectOptions::from_str(&self.url)
            .map_err(AppError::Database)?
            .create_if_missing(true)
            .foreign_keys(true);

        SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(AppError::Database)
    }
}
