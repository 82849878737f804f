//! OpenAPI specification for the Taskdesk API

use axum::response::Json;
use taskdesk_core::{Role, Task, TaskStatus, TaskSummary};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use crate::error::ErrorBody;
use crate::handlers::{
    CreateTaskRequest, CreateTaskResponse, HealthResponse, TaskListResponse, TaskSummaryResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskdesk API",
        version = "0.1.0",
        description = "Task assignment and tracking for employers and employees",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        // Health endpoints
        crate::handlers::health_check,

        // Employee endpoints
        crate::handlers::list_own_tasks,
        crate::handlers::update_task_status,

        // Employer endpoints
        crate::handlers::create_task,
        crate::handlers::list_tasks,
        crate::handlers::task_summary,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            Role,
            Task,
            TaskStatus,
            TaskSummary,
            TaskListResponse,
            CreateTaskRequest,
            CreateTaskResponse,
            TaskSummaryResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Employee", description = "Tasks assigned to the authenticated employee"),
        (name = "Employer", description = "Task creation, listing and reporting"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers HTTP Basic as the `basic_auth` scheme
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

/// Serve the generated document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
