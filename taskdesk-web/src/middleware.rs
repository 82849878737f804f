//! Route-group middleware

use crate::auth::{require_role, AuthError, Authenticator};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use taskdesk_core::Role;
use tracing::debug;

/// Authenticates the request and admits only callers holding `role`
#[derive(Clone)]
pub struct RoleGuard {
    authenticator: Authenticator,
    role: Role,
}

impl RoleGuard {
    pub fn new(authenticator: Authenticator, role: Role) -> Self {
        Self {
            authenticator,
            role,
        }
    }
}

/// On success the caller's `Identity` is added to the request extensions
pub async fn role_guard(
    State(guard): State<RoleGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = guard
        .authenticator
        .authenticate(request.headers().get(AUTHORIZATION))
        .await?;
    require_role(&identity, guard.role)?;

    debug!(user_id = identity.id, role = %guard.role, path = %request.uri().path(), "access granted");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{current_identity, hash_password, Credentials};
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use std::sync::Arc;
    use taskdesk_store::MemoryUserRepository;
    use tower::ServiceExt;

    async fn guarded(role: Role) -> Router {
        let users = MemoryUserRepository::new();
        users
            .add("emma", &hash_password("pw-emma").unwrap(), Role::Employee)
            .await;
        users
            .add("olga", &hash_password("pw-olga").unwrap(), Role::Employer)
            .await;
        let guard = RoleGuard::new(Authenticator::new(Arc::new(users)), role);

        Router::new()
            .route(
                "/",
                get(|request: Request| async move {
                    let username = current_identity(request.extensions())
                        .map(|identity| identity.username.clone())
                        .unwrap_or_default();
                    username
                }),
            )
            .route_layer(middleware::from_fn_with_state(guard, role_guard))
    }

    async fn call(app: Router, credentials: Option<Credentials>) -> (StatusCode, String) {
        let mut request = axum::http::Request::builder().uri("/");
        if let Some(credentials) = credentials {
            request = request.header(AUTHORIZATION, credentials.to_header_value());
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_matching_role_passes_identity_through() {
        let app = guarded(Role::Employee).await;
        let (status, body) = call(app, Some(Credentials::new("emma", "pw-emma"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "emma");
    }

    #[tokio::test]
    async fn test_other_role_is_forbidden() {
        let app = guarded(Role::Employee).await;
        let (status, _) = call(app, Some(Credentials::new("olga", "pw-olga"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unauthenticated_is_unauthorized() {
        let app = guarded(Role::Employer).await;
        let (status, _) = call(app.clone(), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(app, Some(Credentials::new("olga", "wrong"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
