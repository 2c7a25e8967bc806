use async_trait::async_trait;
use thiserror::Error;

use crate::sections::{NewSection, SectionKind, SectionRecord};
use crate::types::{Credentials, NewUser, UserIdentity};

/// Errors from any persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(
                    db_err.constraint().unwrap_or("unknown constraint").to_string(),
                )
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Sqlx(err),
        }
    }
}

/// Login material lookup and user creation, keyed by user name.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<Credentials>, StoreError>;

    /// Fails with `UniqueViolation` when the user name is taken.
    async fn create_user(&self, user: NewUser) -> Result<UserIdentity, StoreError>;
}

/// User lookup by numeric id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserIdentity>, StoreError>;
}

/// One row per (user, kind). Implementations must reject a second row for the
/// same pair with `UniqueViolation`.
#[async_trait]
pub trait SectionStore: Send + Sync {
    async fn find_by_user(
        &self,
        kind: SectionKind,
        user: &UserIdentity,
    ) -> Result<Option<SectionRecord>, StoreError>;

    async fn insert(&self, section: NewSection) -> Result<SectionRecord, StoreError>;

    /// Replaces every content field of an existing row in one statement.
    async fn update(&self, record: &SectionRecord) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
