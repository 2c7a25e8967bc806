#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use sections_api::config::SecurityConfig;
use sections_api::database::{MemoryStore, Stores};
use sections_api::{router, AppState};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

pub fn security() -> SecurityConfig {
    SecurityConfig {
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiry_hours: Some(1),
        cors_origins: vec!["http://localhost:5173".to_string()],
    }
}

/// Full router over a fresh in-memory store
pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let security = security();
    let state = AppState::new(&security, Stores::from_backend(store.clone()));

    TestApp {
        router: router(state.clone(), &security),
        state,
        store,
    }
}

impl TestApp {
    pub async fn post(&self, path: &str, body: Value, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        self.send(builder.body(Body::from(body.to_string()))?).await
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(Request::builder().uri(path).body(Body::empty())?).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    /// Register `user_name` and log in; returns (user id, access token)
    pub async fn signed_in(&self, user_name: &str, password: &str) -> Result<(i64, String)> {
        let (status, _) = self
            .post(
                "/auth/register",
                serde_json::json!({
                    "userName": user_name,
                    "email": format!("{}@example.com", user_name),
                    "password": password,
                }),
                None,
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register returned {}", status);

        let (status, body) = self
            .post(
                "/auth/login",
                serde_json::json!({ "userName": user_name, "password": password }),
                None,
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login returned {}", status);

        let user_id = body["data"]["userId"].as_i64().unwrap_or_default();
        let token = body["data"]["accessToken"].as_str().unwrap_or_default().to_string();
        Ok((user_id, token))
    }
}
