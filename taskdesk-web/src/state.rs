//! Shared application state

use crate::{auth::Authenticator, WebConfig, WebError, WebResult};
use std::sync::Arc;
use taskdesk_store::{
    DatabaseConfig, MemoryTaskRepository, MemoryUserRepository, PgTaskRepository,
    PgUserRepository, TaskRepository, UserRepository,
};
use tracing::info;

/// Handles to the accessors, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub config: WebConfig,
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(
        config: WebConfig,
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
    ) -> Self {
        let authenticator = Authenticator::new(users.clone());
        Self {
            config,
            users,
            tasks,
            authenticator,
        }
    }

    /// State backed by PostgreSQL. Connections are opened on first use.
    pub fn connect(config: WebConfig, database: &DatabaseConfig) -> WebResult<Self> {
        let pool = database.connect_lazy().map_err(WebError::Store)?;
        info!(database = %database.database, "using postgres accessors");
        Ok(Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgTaskRepository::new(pool)),
        ))
    }

    /// State backed by the in-memory accessors
    pub fn in_memory(config: WebConfig, users: MemoryUserRepository) -> Self {
        let tasks = MemoryTaskRepository::new(users.clone());
        Self::new(config, Arc::new(users), Arc::new(tasks))
    }
}
