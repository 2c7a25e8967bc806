// handlers/public/auth/register.rs - POST /auth/register handler

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::register_user;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReply {
    pub user_id: i64,
    pub user_name: String,
    pub email: String,
}

/// POST /auth/register - Create a new account
///
/// Expected Input:
/// ```json
/// { "userName": "alice", "email": "alice@example.com", "password": "wonderland" }
/// ```
///
/// Responds 201 with `{userId, userName, email}`; 409 when the user name is taken.
pub async fn register_post(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<UserReply> {
    let identity = register_user(
        state.stores.credentials.as_ref(),
        &state.hasher,
        &request.user_name,
        &request.email,
        &request.password,
    )
    .await?;

    Ok(ApiResponse::created(UserReply {
        user_id: identity.user_id,
        user_name: identity.user_name,
        email: request.email,
    }))
}
