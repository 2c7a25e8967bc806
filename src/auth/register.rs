use thiserror::Error;

use crate::auth::password::{PasswordError, PasswordHasher};
use crate::database::store::{CredentialStore, StoreError};
use crate::types::{NewUser, UserIdentity};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("User name '{0}' is already taken")]
    Duplicate(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(StoreError),
}

/// Hashes the password and stores a new user. Only non-emptiness is checked.
pub async fn register_user(
    credentials: &dyn CredentialStore,
    hasher: &PasswordHasher,
    user_name: &str,
    email: &str,
    password: &str,
) -> Result<UserIdentity, RegistrationError> {
    if user_name.trim().is_empty() {
        return Err(RegistrationError::MissingField("userName"));
    }
    if password.is_empty() {
        return Err(RegistrationError::MissingField("password"));
    }

    let password_hash = hasher.hash(password)?;

    let identity = credentials
        .create_user(NewUser {
            user_name: user_name.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => RegistrationError::Duplicate(user_name.to_string()),
            other => RegistrationError::Store(other),
        })?;

    tracing::info!("Registered user '{}' (id {})", identity.user_name, identity.user_id);
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    #[tokio::test]
    async fn test_registered_password_is_hashed() {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new();

        let identity = register_user(&store, &hasher, "carol", "c@example.com", "s3cret")
            .await
            .unwrap();

        let stored = store.find_by_user_name("carol").await.unwrap().unwrap();
        assert_eq!(stored.user_id, identity.user_id);
        assert_ne!(stored.password_hash, "s3cret");
        assert!(hasher.verify("s3cret", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_duplicate_user_name_rejected() {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new();

        register_user(&store, &hasher, "carol", "", "one").await.unwrap();
        let second = register_user(&store, &hasher, "carol", "", "two").await;

        assert!(matches!(second, Err(RegistrationError::Duplicate(name)) if name == "carol"));
    }

    #[tokio::test]
    async fn test_empty_fields_rejected() {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new();

        assert!(matches!(
            register_user(&store, &hasher, " ", "", "pw").await,
            Err(RegistrationError::MissingField("userName"))
        ));
        assert!(matches!(
            register_user(&store, &hasher, "dave", "", "").await,
            Err(RegistrationError::MissingField("password"))
        ));
    }
}
