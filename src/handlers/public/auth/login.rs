// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
    pub user_id: i64,
    pub user_name: String,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

/// POST /auth/login - Authenticate user and receive an access token
///
/// Expected Input:
/// ```json
/// { "userName": "alice", "password": "wonderland" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "userId": 1,
///     "userName": "alice",
///     "accessToken": "eyJhbGciOiJIUzI1NiI...",
///     "expiresIn": 604800
///   }
/// }
/// ```
///
/// Unknown user and wrong password produce the same 401.
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<LoginReply> {
    let identity = state
        .authenticator
        .authenticate(&request.user_name, &request.password)
        .await
        .ok_or_else(|| ApiError::unauthorized("Authentication failed"))?;

    let token = state.issuer.issue(&identity)?;
    tracing::info!("Login completed for user {}", identity.user_id);

    Ok(ApiResponse::success(LoginReply {
        user_id: identity.user_id,
        user_name: identity.user_name,
        access_token: token.token,
        expires_in: token.expires_in,
    }))
}
