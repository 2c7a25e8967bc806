// handlers/system.rs - GET / and GET /health

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::{operations, AppState};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - Service name, version and the operation table
pub async fn root() -> ApiResponse<Value> {
    let endpoints: Vec<Value> = operations()
        .iter()
        .map(|op| {
            json!({
                "operation": op.name,
                "route": format!("POST {}", op.path),
                "requiresAuth": op.requires_auth,
            })
        })
        .collect();

    ApiResponse::success(json!({
        "name": "Sections API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    }))
}

/// GET /health - Pings the section store
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();

    match state.stores.sections.health_check().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("database unavailable"))
        }
    }
}
