//! Basic-credential authentication against the user store

use super::{password, AuthError, Credentials};
use axum::http::HeaderValue;
use std::sync::Arc;
use taskdesk_core::Identity;
use taskdesk_store::{StoreError, UserCriteria, UserRepository};
use tracing::{debug, error, warn};

/// Resolves an `Authorization` header to an [`Identity`]
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        password::prepare_placeholder();
        Self { users }
    }

    /// Authenticate one request. No session is created; every request carries
    /// its credentials.
    pub async fn authenticate(&self, header: Option<&HeaderValue>) -> Result<Identity, AuthError> {
        let Credentials { username, password } = Credentials::from_header(header).map_err(|e| {
            debug!(reason = %e, "rejecting authorization header");
            e
        })?;

        match self
            .users
            .find_one(&UserCriteria::by_username(username.as_str()))
            .await
        {
            Ok(identity) => {
                let hash = identity.password_hash.clone();
                if verify_off_thread(password, Some(hash)).await {
                    debug!(user_id = identity.id, role = %identity.role, "authenticated");
                    Ok(identity)
                } else {
                    debug!(%username, "password mismatch");
                    Err(AuthError::InvalidCredentials)
                }
            }
            Err(StoreError::NotFound) => {
                verify_off_thread(password, None).await;
                debug!(%username, "unknown username");
                Err(AuthError::InvalidCredentials)
            }
            Err(err) if err.is_retryable() => {
                error!(error = %err, "credential lookup failed");
                Err(AuthError::StoreUnavailable(err))
            }
            Err(err) => {
                verify_off_thread(password, None).await;
                warn!(error = %err, %username, "credential lookup rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

/// Argon2 verification is CPU-bound; keep it off the async workers. With no
/// stored hash the placeholder is verified instead and the result is `false`.
async fn verify_off_thread(password: String, hash: Option<String>) -> bool {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => password::verify_password(&password, &hash),
        None => password::verify_placeholder(&password),
    })
    .await
    .unwrap_or_else(|e| {
        warn!(error = %e, "password verification task failed");
        false
    })
}
