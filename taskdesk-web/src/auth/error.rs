//! Authentication and authorization errors

use crate::error::{error_response, MSG_FORBIDDEN, MSG_INTERNAL, MSG_UNAUTHORIZED};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use taskdesk_core::Role;
use taskdesk_store::StoreError;

/// Every authentication failure is one of these; the underlying cause is only logged
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("role {required} required")]
    Forbidden { required: Role },

    /// A handler asked for the caller before anything authenticated the request
    #[error("no authenticated identity on request")]
    NoIdentity,

    #[error("credential store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidCredentials | AuthError::NoIdentity => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            StatusCode::UNAUTHORIZED => MSG_UNAUTHORIZED,
            StatusCode::FORBIDDEN => MSG_FORBIDDEN,
            _ => MSG_INTERNAL,
        };
        error_response(status, message)
    }
}
