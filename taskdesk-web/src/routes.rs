//! Route definitions for the Taskdesk API

use crate::{
    handlers,
    middleware::{role_guard, RoleGuard},
    openapi, AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use taskdesk_core::Role;

/// Version prefix of the task API
pub const API_PREFIX: &str = "/api/v1";

/// Routes for employees; every route requires the `EMPLOYEE` role
pub fn employee_routes(state: &AppState) -> Router<AppState> {
    let guard = RoleGuard::new(state.authenticator.clone(), Role::Employee);
    Router::new()
        .route("/tasks", get(handlers::list_own_tasks))
        .route(
            "/tasks/{id}/status/{status}",
            put(handlers::update_task_status),
        )
        .route_layer(from_fn_with_state(guard, role_guard))
}

/// Routes for employers; every route requires the `EMPLOYER` role
pub fn employer_routes(state: &AppState) -> Router<AppState> {
    let guard = RoleGuard::new(state.authenticator.clone(), Role::Employer);
    Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/tasks/summary", get(handlers::task_summary))
        .route_layer(from_fn_with_state(guard, role_guard))
}

/// Versioned API routes
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/employee", employee_routes(state))
        .nest("/employer", employer_routes(state))
}

/// Create all routes combined
pub fn all_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/api/openapi.json", get(openapi::openapi_json))
        .nest(API_PREFIX, api_routes(state))
        .fallback(handlers::not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebConfig;
    use axum::http::StatusCode;
    use taskdesk_store::MemoryUserRepository;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::in_memory(WebConfig::default(), MemoryUserRepository::new())
    }

    async fn get_status(uri: &str) -> StatusCode {
        let state = state();
        let app = all_routes(&state).with_state(state);
        app.oneshot(
            axum::http::Request::builder()
                .uri(uri)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_health_check_route() {
        assert_eq!(get_status("/api/v1/health").await, StatusCode::OK);
        assert_eq!(get_status("/ping").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guarded_routes_require_credentials() {
        for uri in [
            "/api/v1/employee/tasks",
            "/api/v1/employer/tasks",
            "/api/v1/employer/tasks/summary",
        ] {
            assert_eq!(get_status(uri).await, StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(get_status("/api/v1/admin").await, StatusCode::NOT_FOUND);
    }
}
