//! Client-facing errors
//!
//! Every failure leaves the server as `{"error": <message>, "code": <status>}`.
//! The message is fixed per status code unless a handler supplies one; the
//! internal cause is logged and never returned.

use crate::auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use taskdesk_core::TaskdeskError;
use taskdesk_store::StoreError;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

pub const MSG_BAD_REQUEST: &str =
    "the server could not understand the request due to invalid syntax";
pub const MSG_UNAUTHORIZED: &str =
    "the server could not verify that you are authorized to access the requested resource";
pub const MSG_FORBIDDEN: &str =
    "you do not have to sufficient role to access the requested resource";
pub const MSG_NOT_FOUND: &str = "the server could not find the requested resource";
pub const MSG_INTERNAL: &str =
    "the server encountered an error and could not complete your request";

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "the server could not find the requested resource")]
    pub error: String,
    #[schema(example = 404)]
    pub code: u16,
}

/// Default public message for a status code
pub fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => MSG_BAD_REQUEST,
        StatusCode::UNAUTHORIZED => MSG_UNAUTHORIZED,
        StatusCode::FORBIDDEN => MSG_FORBIDDEN,
        StatusCode::NOT_FOUND => MSG_NOT_FOUND,
        _ => MSG_INTERNAL,
    }
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        error: message.to_string(),
        code: status.as_u16(),
    };
    (status, Json(body)).into_response()
}

/// Handler errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// 400 with a message the client is meant to see
    #[error("{0}")]
    Rejected(&'static str),

    #[error("resource not found")]
    NotFound,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("store failure: {0}")]
    Store(#[source] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Auth(err) => err.status(),
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Invalid(invalid) => invalid.into(),
            other => ApiError::Store(other),
        }
    }
}

impl From<TaskdeskError> for ApiError {
    fn from(err: TaskdeskError) -> Self {
        debug!(field = err.field(), error = %err, "invalid input");
        ApiError::InvalidInput(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => err.into_response(),
            ApiError::Rejected(message) => {
                warn!(reason = message, "request rejected");
                error_response(StatusCode::BAD_REQUEST, message)
            }
            ApiError::Store(err) => {
                error!(error = %err, retryable = err.is_retryable(), "store operation failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
            }
            other => {
                warn!(error = %other, "request failed");
                let status = other.status();
                error_response(status, default_message(status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_store_not_found_maps_to_404() {
        let response = ApiError::from(StoreError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], MSG_NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let err = StoreError::Invalid(TaskdeskError::validation("title", "missing title"));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], MSG_BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejected_keeps_its_message() {
        let response = ApiError::Rejected("assignedUserID is not an employee").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "assignedUserID is not an employee");
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_store_failure_hides_cause() {
        let err = StoreError::InvalidRow("role column held 'ADMIN'".to_string());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], MSG_INTERNAL);
        assert!(!body.to_string().contains("ADMIN"));
    }
}
