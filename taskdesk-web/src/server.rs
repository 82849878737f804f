//! Taskdesk Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use taskdesk_store::DatabaseConfig;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main Taskdesk web server
pub struct TaskdeskServer {
    config: WebConfig,
    state: AppState,
}

impl TaskdeskServer {
    /// Create a server over existing state
    pub fn new(config: WebConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Create a server backed by PostgreSQL
    pub fn connect(config: WebConfig, database: &DatabaseConfig) -> WebResult<Self> {
        let state = AppState::connect(config.clone(), database)?;
        Ok(Self::new(config, state))
    }

    /// Serve until SIGINT or SIGTERM, then drain in-flight requests
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();
        let app = create_app(self.state);

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!(%address, "server listening");

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!(error = %e, "server error");
            return Err(WebError::Server(e));
        }

        info!("server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }
}

/// Builder for TaskdeskServer
pub struct TaskdeskServerBuilder {
    config: WebConfig,
    database: DatabaseConfig,
}

impl TaskdeskServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
            database: DatabaseConfig::default(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn config(mut self, config: WebConfig) -> Self {
        self.config = config;
        self
    }

    pub fn database(mut self, database: DatabaseConfig) -> Self {
        self.database = database;
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<TaskdeskServer> {
        TaskdeskServer::connect(self.config, &self.database)
    }
}

impl Default for TaskdeskServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
