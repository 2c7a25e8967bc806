pub mod manager;
pub mod memory;
pub mod postgres;
pub mod store;

use std::sync::Arc;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{CredentialStore, SectionStore, StoreError, UserDirectory};

use crate::config::DatabaseConfig;

/// The persistence collaborators the service depends on, behind trait objects.
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub users: Arc<dyn UserDirectory>,
    pub sections: Arc<dyn SectionStore>,
}

impl Stores {
    /// One backend serving all three roles
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: CredentialStore + UserDirectory + SectionStore + 'static,
    {
        Self {
            credentials: backend.clone(),
            users: backend.clone(),
            sections: backend,
        }
    }

    pub fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }

    /// Postgres when DATABASE_URL is configured, the in-memory store otherwise
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.url.is_none() {
            tracing::warn!("DATABASE_URL not set, using the in-memory store; data will not survive a restart");
            return Ok(Self::memory());
        }

        let pool = DatabaseManager::connect(config).await?;
        if config.run_migrations {
            DatabaseManager::migrate(&pool).await?;
        }

        Ok(Self::from_backend(Arc::new(PgStore::new(pool))))
    }
}
