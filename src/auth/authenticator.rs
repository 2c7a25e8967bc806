use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::database::store::CredentialStore;
use crate::types::UserIdentity;

/// Verifies a user name / password pair against stored credentials.
///
/// Unknown users, wrong passwords and store failures all yield `None`.
pub struct Authenticator {
    credentials: Arc<dyn CredentialStore>,
    hasher: Arc<PasswordHasher>,
    // Verified against when the user does not exist, so both paths pay for a hash
    decoy_hash: Option<String>,
}

impl Authenticator {
    pub fn new(credentials: Arc<dyn CredentialStore>, hasher: Arc<PasswordHasher>) -> Self {
        let decoy_hash = hasher.hash("decoy-password-for-unknown-users").ok();
        Self {
            credentials,
            hasher,
            decoy_hash,
        }
    }

    pub async fn authenticate(&self, user_name: &str, password: &str) -> Option<UserIdentity> {
        let stored = match self.credentials.find_by_user_name(user_name).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!("Credential lookup failed for '{}': {}", user_name, e);
                return None;
            }
        };

        let Some(credentials) = stored else {
            if let Some(decoy) = &self.decoy_hash {
                let _ = self.hasher.verify(password, decoy);
            }
            tracing::warn!("Authentication failed for '{}'", user_name);
            return None;
        };

        if !self.hasher.verify(password, &credentials.password_hash) {
            tracing::warn!("Authentication failed for '{}'", user_name);
            return None;
        }

        tracing::debug!("Authenticated '{}' (id {})", credentials.user_name, credentials.user_id);
        Some(credentials.identity())
    }
}
