use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the shared connection pool.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Build a lazily-connecting pool; the first query opens connections.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let connection_string = Self::build_connection_string(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(&connection_string)?;

        info!(
            "Database pool configured (max_connections={}, timeout={}s)",
            config.max_connections, config.connection_timeout
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Normalise `postgres://` / `postgresql://` URLs, defaulting the port to 5432.
    /// User info is required; the password may be empty.
    fn build_connection_string(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw.trim())
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;

        match url.scheme() {
            "postgres" | "postgresql" => {}
            other => {
                return Err(DatabaseError::InvalidDatabaseUrl(format!(
                    "unsupported scheme '{}'",
                    other
                )))
            }
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(DatabaseError::InvalidDatabaseUrl("missing host".to_string()));
        }
        if url.username().is_empty() {
            return Err(DatabaseError::InvalidDatabaseUrl("missing user info".to_string()));
        }
        if url.path().trim_start_matches('/').is_empty() {
            return Err(DatabaseError::InvalidDatabaseUrl("missing database name".to_string()));
        }
        if url.port().is_none() {
            url.set_port(Some(5432))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl("cannot set port".to_string()))?;
        }
        Ok(url.into())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
