//! Database connection settings

use crate::error::{StoreError, StoreResult};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

/// PostgreSQL connection settings, read from `PG_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: "password".to_string(),
            database: "task_management".to_string(),
            ssl_mode: "disable".to_string(),
            max_connections: 10,
        }
    }
}

impl DatabaseConfig {
    /// Defaults overridden by any non-empty `PG_*` variable
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            host: get("PG_HOST").unwrap_or(defaults.host),
            port: get("PG_PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            username: get("PG_USERNAME").unwrap_or(defaults.username),
            password: get("PG_PASSWORD").unwrap_or(defaults.password),
            database: get("PG_DATABASE").unwrap_or(defaults.database),
            ssl_mode: get("PG_SSLMODE").unwrap_or(defaults.ssl_mode),
            max_connections: get("PG_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.max_connections),
        }
    }

    pub fn connect_options(&self) -> StoreResult<PgConnectOptions> {
        let ssl_mode: PgSslMode = self
            .ssl_mode
            .parse()
            .map_err(|_| StoreError::Config(format!("unknown sslmode: {}", self.ssl_mode)))?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode))
    }

    /// A pool that opens connections on first use
    pub fn connect_lazy(&self) -> StoreResult<PgPool> {
        let options = self.connect_options()?;
        info!(
            host = %self.host,
            port = self.port,
            database = %self.database,
            max_connections = self.max_connections,
            "configuring postgres pool"
        );
        Ok(PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy_with(options))
    }
}
