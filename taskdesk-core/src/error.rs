//! Domain-level errors
//!
//! These cover values a caller supplied that the domain rejects. Storage and
//! authentication failures have their own error types in the crates that own them.

use thiserror::Error;

pub type TaskdeskResult<T> = Result<T, TaskdeskError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskdeskError {
    #[error("invalid column: {0}")]
    InvalidColumn(String),

    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl TaskdeskError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Name of the offending input, for logs
    pub fn field(&self) -> &str {
        match self {
            TaskdeskError::InvalidColumn(_) => "sortBy",
            TaskdeskError::InvalidSortOrder(_) => "sortOrder",
            TaskdeskError::InvalidStatus(_) => "status",
            TaskdeskError::InvalidRole(_) => "role",
            TaskdeskError::Validation { field, .. } => field,
        }
    }
}
