//! HTTP request handlers for the Taskdesk API
//!
//! Handlers behind a role guard take the caller from [`crate::auth::CurrentUser`].

pub mod employee;
pub mod employer;
pub mod health;
pub mod types;

pub use employee::*;
pub use employer::*;
pub use health::*;

// Re-export all types for convenience
pub use types::*;

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
