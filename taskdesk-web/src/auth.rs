//! Authentication and authorization
//!
//! Requests authenticate with `Authorization: Basic`. The [`RoleGuard`]
//! middleware runs the [`Authenticator`], applies the role gate and stores the
//! resulting [`Identity`] in the request extensions; handlers receive it through
//! the [`CurrentUser`] extractor.
//!
//! [`RoleGuard`]: crate::middleware::RoleGuard

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod password;

#[cfg(test)]
mod tests;

pub use authenticator::Authenticator;
pub use credentials::Credentials;
pub use error::AuthError;
pub use password::{hash_password, verify_password};

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Extensions},
};
use taskdesk_core::{Identity, Role};
use tracing::warn;

/// Pass iff the identity holds exactly the required role
pub fn require_role(identity: &Identity, required: Role) -> Result<(), AuthError> {
    if identity.role == required {
        Ok(())
    } else {
        warn!(
            user_id = identity.id,
            role = %identity.role,
            %required,
            "role mismatch"
        );
        Err(AuthError::Forbidden { required })
    }
}

/// The identity an earlier authentication step attached to the request
pub fn current_identity(extensions: &Extensions) -> Result<&Identity, AuthError> {
    extensions.get::<Identity>().ok_or(AuthError::NoIdentity)
}

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_identity(&parts.extensions) {
            Ok(identity) => Ok(CurrentUser(identity.clone())),
            Err(err) => {
                warn!(path = %parts.uri.path(), "handler reached without an authenticated identity");
                Err(err)
            }
        }
    }
}
