/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Authenticated user as seen by the auth layer and section handlers.
/// Produced by `Authenticator` and `TokenValidator`; never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: i64,
    pub user_name: String,
}

impl UserIdentity {
    pub fn new(user_id: i64, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
        }
    }
}

/// Stored login material for one user. The hash is the only persisted secret.
#[derive(Clone)]
pub struct Credentials {
    pub user_id: i64,
    pub user_name: String,
    pub password_hash: String,
}

impl Credentials {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.user_id, self.user_name.clone())
    }
}

// Hand-written so the hash never ends up in logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Registration payload after the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
}
