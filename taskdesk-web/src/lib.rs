//! Taskdesk Web Server
//!
//! HTTP API for employer/employee task management. Callers authenticate with
//! HTTP Basic credentials on every request; route groups are gated by role.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use server::TaskdeskServer;
pub use state::AppState;

use axum::Router;
use taskdesk_core::LoggingConfig;
use taskdesk_store::StoreError;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    routes::all_routes(&state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl WebConfig {
    /// Load configuration from `HOST_PORT` (`host:port` or `:port`)
    pub fn from_env() -> Self {
        std::env::var("HOST_PORT")
            .ok()
            .and_then(|value| Self::parse_host_port(&value))
            .unwrap_or_default()
    }

    /// Parse `host:port`; an empty host binds every interface
    pub fn parse_host_port(value: &str) -> Option<Self> {
        let (host, port) = value.trim().rsplit_once(':')?;
        let port = port.parse().ok()?;
        let host = if host.is_empty() {
            Self::default().host
        } else {
            host.to_string()
        };
        Some(Self { host, port })
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging(config: &LoggingConfig) -> WebResult<()> {
    taskdesk_core::init_logging(config).map_err(|e| WebError::Logging(e.to_string()))
}
