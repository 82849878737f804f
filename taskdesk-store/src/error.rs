//! Store errors

use taskdesk_core::TaskdeskError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A single-row fetch or update matched nothing
    #[error("no matching rows")]
    NotFound,

    /// A single-row fetch matched more than one row
    #[error("expected exactly one row, found several")]
    AmbiguousResult,

    /// The store could not be reached or rejected the statement
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// A row came back in a shape the accessor cannot decode
    #[error("invalid row: {0}")]
    InvalidRow(String),

    #[error("invalid database configuration: {0}")]
    Config(String),

    /// The input was rejected before reaching the store
    #[error(transparent)]
    Invalid(#[from] TaskdeskError),
}

impl StoreError {
    /// Only connectivity failures are worth retrying, and only by an outer caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => StoreError::InvalidRow(error.to_string()),
            sqlx::Error::Configuration(source) => StoreError::Config(source.to_string()),
            other => StoreError::Unavailable(other),
        }
    }
}
