use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::database::store::{CredentialStore, SectionStore, StoreError, UserDirectory};
use crate::sections::{NewSection, SectionKind, SectionRecord};
use crate::types::{Credentials, NewUser, UserIdentity};

#[derive(Default)]
struct Tables {
    next_user_id: i64,
    next_section_id: i64,
    users: HashMap<i64, StoredUser>,
    sections: HashMap<(SectionKind, i64), SectionRecord>,
}

struct StoredUser {
    user_name: String,
    #[allow(dead_code)]
    email: String,
    password_hash: String,
}

/// Process-local store with the same uniqueness rules as the Postgres schema.
/// Used in development when no DATABASE_URL is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Number of stored sections of `kind`, across all users.
    pub fn section_count(&self, kind: SectionKind) -> usize {
        self.lock()
            .map(|t| t.sections.keys().filter(|(k, _)| *k == kind).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<Credentials>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .iter()
            .find(|(_, u)| u.user_name == user_name)
            .map(|(id, u)| Credentials {
                user_id: *id,
                user_name: u.user_name.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn create_user(&self, user: NewUser) -> Result<UserIdentity, StoreError> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.user_name == user.user_name) {
            return Err(StoreError::UniqueViolation("users_user_name_key".to_string()));
        }

        tables.next_user_id += 1;
        let user_id = tables.next_user_id;
        tables.users.insert(
            user_id,
            StoredUser {
                user_name: user.user_name.clone(),
                email: user.email,
                password_hash: user.password_hash,
            },
        );

        Ok(UserIdentity::new(user_id, user.user_name))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserIdentity>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .get(&user_id)
            .map(|u| UserIdentity::new(user_id, u.user_name.clone())))
    }
}

#[async_trait]
impl SectionStore for MemoryStore {
    async fn find_by_user(
        &self,
        kind: SectionKind,
        user: &UserIdentity,
    ) -> Result<Option<SectionRecord>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.sections.get(&(kind, user.user_id)).cloned())
    }

    async fn insert(&self, section: NewSection) -> Result<SectionRecord, StoreError> {
        let mut tables = self.lock()?;
        let key = (section.kind, section.user_id);
        if tables.sections.contains_key(&key) {
            return Err(StoreError::UniqueViolation(format!(
                "{}_user_id_key",
                section.kind.table()
            )));
        }
        if !tables.users.contains_key(&section.user_id) {
            return Err(StoreError::QueryError(format!(
                "user {} does not exist",
                section.user_id
            )));
        }

        tables.next_section_id += 1;
        let record = SectionRecord {
            id: tables.next_section_id,
            user_id: section.user_id,
            kind: section.kind,
            fields: section.fields,
        };
        tables.sections.insert(key, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &SectionRecord) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        match tables.sections.get_mut(&(record.kind, record.user_id)) {
            Some(existing) if existing.id == record.id => {
                existing.fields = record.fields.clone();
                Ok(())
            }
            _ => Err(StoreError::QueryError(format!(
                "{} row {} not found",
                record.kind.table(),
                record.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::SectionFields;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            user_name: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn user_names_are_unique() {
        let store = MemoryStore::new();
        store.create_user(new_user("erin")).await.unwrap();

        let dup = store.create_user(new_user("erin")).await;
        assert!(matches!(dup, Err(StoreError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn one_section_per_user_and_kind() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("erin")).await.unwrap();
        let section = || NewSection {
            user_id: user.user_id,
            kind: SectionKind::Nav,
            fields: SectionFields::new().with("basic", "b"),
        };

        store.insert(section()).await.unwrap();
        assert!(matches!(
            store.insert(section()).await,
            Err(StoreError::UniqueViolation(c)) if c == "nav_section_user_id_key"
        ));

        // Same user, other kind is fine
        store
            .insert(NewSection {
                kind: SectionKind::Footer,
                ..section()
            })
            .await
            .unwrap();
        assert_eq!(store.section_count(SectionKind::Nav), 1);
        assert_eq!(store.section_count(SectionKind::Footer), 1);
    }
}
