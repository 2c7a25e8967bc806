use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::database::manager::DatabaseManager;
use crate::database::store::{CredentialStore, SectionStore, StoreError, UserDirectory};
use crate::sections::{NewSection, SectionFields, SectionKind, SectionRecord};
use crate::types::{Credentials, NewUser, UserIdentity};

/// Postgres-backed implementation of every store trait.
///
/// Section SQL is assembled from `SectionKind::table()` / `fields()`, which are
/// static identifiers, never caller input.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select_sql(kind: SectionKind) -> String {
        format!(
            "SELECT id, user_id, {} FROM {} WHERE user_id = $1",
            kind.fields().join(", "),
            kind.table()
        )
    }

    fn insert_sql(kind: SectionKind) -> String {
        let fields = kind.fields();
        let placeholders: Vec<String> = (0..fields.len()).map(|i| format!("${}", i + 2)).collect();
        format!(
            "INSERT INTO {} (user_id, {}) VALUES ($1, {}) RETURNING id",
            kind.table(),
            fields.join(", "),
            placeholders.join(", ")
        )
    }

    fn update_sql(kind: SectionKind) -> String {
        let assignments: Vec<String> = kind
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| format!("{} = ${}", field, i + 2))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = $1",
            kind.table(),
            assignments.join(", ")
        )
    }

    fn row_to_record(kind: SectionKind, row: &PgRow) -> Result<SectionRecord, StoreError> {
        let mut fields = SectionFields::new();
        for field in kind.fields() {
            let value: Option<String> = row.try_get(*field)?;
            fields.set(*field, value.unwrap_or_default());
        }

        Ok(SectionRecord {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            kind,
            fields,
        })
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<Credentials>, StoreError> {
        let row = sqlx::query("SELECT user_id, user_name, password FROM users WHERE user_name = $1")
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<Credentials, StoreError> {
            Ok(Credentials {
                user_id: row.try_get("user_id")?,
                user_name: row.try_get("user_name")?,
                password_hash: row.try_get("password")?,
            })
        })
        .transpose()
    }

    async fn create_user(&self, user: NewUser) -> Result<UserIdentity, StoreError> {
        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (user_name, email, password) VALUES ($1, $2, $3) RETURNING user_id",
        )
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserIdentity::new(user_id, user.user_name))
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserIdentity>, StoreError> {
        let user_name: Option<String> =
            sqlx::query_scalar("SELECT user_name FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user_name.map(|name| UserIdentity::new(user_id, name)))
    }
}

#[async_trait]
impl SectionStore for PgStore {
    async fn find_by_user(
        &self,
        kind: SectionKind,
        user: &UserIdentity,
    ) -> Result<Option<SectionRecord>, StoreError> {
        let sql = Self::select_sql(kind);
        let row = sqlx::query(&sql)
            .bind(user.user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_record(kind, &row)).transpose()
    }

    async fn insert(&self, section: NewSection) -> Result<SectionRecord, StoreError> {
        let sql = Self::insert_sql(section.kind);
        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(section.user_id);
        for field in section.kind.fields() {
            query = query.bind(section.fields.get(field).unwrap_or_default().to_string());
        }
        let id = query.fetch_one(&self.pool).await?;

        Ok(SectionRecord {
            id,
            user_id: section.user_id,
            kind: section.kind,
            fields: section.fields,
        })
    }

    async fn update(&self, record: &SectionRecord) -> Result<(), StoreError> {
        let sql = Self::update_sql(record.kind);
        let mut query = sqlx::query(&sql).bind(record.id);
        for field in record.kind.fields() {
            query = query.bind(record.fields.get(field).unwrap_or_default().to_string());
        }

        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::QueryError(format!(
                "{} row {} not found",
                record.kind.table(),
                record.id
            )));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }
}
