//! Integration test helpers
//!
//! Builds the full router over in-memory accessors and drives it with
//! `tower::ServiceExt::oneshot`, so no database or socket is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use taskdesk_core::{NewTask, Role, TaskStatus};
use taskdesk_store::{MemoryTaskRepository, MemoryUserRepository, TaskRepository};
use taskdesk_web::auth::{hash_password, Credentials};
use taskdesk_web::{create_app, AppState, WebConfig};

// Ensure tracing is only initialised once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

pub const EMPLOYER: (&str, &str) = ("olivia", "olivia-pass");
pub const ALICE: (&str, &str) = ("alice", "alice-pass");
pub const BOB: (&str, &str) = ("bob", "bob-pass");

/// A seeded application: one employer, two employees
pub struct TestApp {
    pub router: Router,
    pub tasks: MemoryTaskRepository,
    pub employer_id: i64,
    pub alice_id: i64,
    pub bob_id: i64,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        LazyLock::force(&TRACING);

        let users = MemoryUserRepository::new();
        let employer_id = users
            .add(EMPLOYER.0, &hash_password(EMPLOYER.1).unwrap(), Role::Employer)
            .await;
        let alice_id = users
            .add(ALICE.0, &hash_password(ALICE.1).unwrap(), Role::Employee)
            .await;
        let bob_id = users
            .add(BOB.0, &hash_password(BOB.1).unwrap(), Role::Employee)
            .await;

        let tasks = MemoryTaskRepository::new(users.clone());
        let state = AppState::new(
            WebConfig::default(),
            Arc::new(users),
            Arc::new(tasks.clone()),
        );

        Self {
            router: create_app(state),
            tasks,
            employer_id,
            alice_id,
            bob_id,
        }
    }

    /// Insert a task directly, bypassing the API
    pub async fn seed_task(&self, title: &str, assignee: i64, due_in_days: i64) -> i64 {
        self.tasks
            .insert(&NewTask {
                title: title.to_string(),
                description: format!("{title} description"),
                assigned_user_id: assignee,
                status: None,
                due_date: Utc::now() + Duration::days(due_in_days),
            })
            .await
            .unwrap()
    }

    pub async fn set_status(&self, task_id: i64, assignee: i64, status: TaskStatus) {
        self.tasks
            .update_status(task_id, assignee, status)
            .await
            .unwrap();
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        credentials: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((username, password)) = credentials {
            builder = builder.header(
                AUTHORIZATION,
                Credentials::new(username, password).to_header_value(),
            );
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = tower::ServiceExt::oneshot(self.router.clone(), request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, credentials: Option<(&str, &str)>) -> TestResponse {
        self.request(Method::GET, uri, credentials, None).await
    }

    pub async fn put(&self, uri: &str, credentials: Option<(&str, &str)>) -> TestResponse {
        self.request(Method::PUT, uri, credentials, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        credentials: Option<(&str, &str)>,
        body: Value,
    ) -> TestResponse {
        self.request(Method::POST, uri, credentials, Some(body))
            .await
    }
}

/// Titles of the tasks in a `{"tasks": [...]}` body, in order
pub fn titles(body: &Value) -> Vec<String> {
    body["tasks"]
        .as_array()
        .map(|tasks| {
            tasks
                .iter()
                .filter_map(|task| task["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
