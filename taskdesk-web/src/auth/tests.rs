//! Tests for the role gate and identity extraction

use super::*;
use axum::{
    body::Body,
    http::{Method, Request},
};
use chrono::Utc;

fn identity(role: Role) -> Identity {
    Identity {
        id: 7,
        username: "tester".to_string(),
        password_hash: String::new(),
        role,
        created_at: Utc::now(),
    }
}

fn request_parts() -> Parts {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/employee/tasks")
        .body(Body::empty())
        .unwrap();
    request.into_parts().0
}

#[test]
fn test_role_gate_requires_exact_role() {
    assert!(require_role(&identity(Role::Employee), Role::Employee).is_ok());
    assert!(require_role(&identity(Role::Employer), Role::Employer).is_ok());

    assert!(matches!(
        require_role(&identity(Role::Employer), Role::Employee),
        Err(AuthError::Forbidden {
            required: Role::Employee
        })
    ));
    assert!(matches!(
        require_role(&identity(Role::Employee), Role::Employer),
        Err(AuthError::Forbidden {
            required: Role::Employer
        })
    ));
}

#[test]
fn test_current_identity_without_authentication() {
    let parts = request_parts();
    assert!(matches!(
        current_identity(&parts.extensions),
        Err(AuthError::NoIdentity)
    ));
}

#[tokio::test]
async fn test_current_user_reads_extensions() {
    let mut parts = request_parts();
    parts.extensions.insert(identity(Role::Employee));

    let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.role, Role::Employee);
}

#[tokio::test]
async fn test_current_user_rejects_unauthenticated_request() {
    let mut parts = request_parts();
    let rejection = CurrentUser::from_request_parts(&mut parts, &())
        .await
        .unwrap_err();
    assert_eq!(rejection.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[test]
fn test_error_statuses() {
    use axum::http::StatusCode;

    assert_eq!(AuthError::MissingCredentials.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        AuthError::Forbidden {
            required: Role::Employer
        }
        .status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AuthError::StoreUnavailable(taskdesk_store::StoreError::Config("down".to_string()))
            .status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
