use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::database::store::{SectionStore, StoreError, UserDirectory};
use crate::sections::{NewSection, Section, SectionFields, SectionKind, SectionRecord};
use crate::types::UserIdentity;

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("Concurrent update of {0} section could not be resolved")]
    Conflict(SectionKind),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Get-or-create-and-merge for one section kind.
///
/// The first call for a (user, kind) pair stores and returns the kind's default
/// content, ignoring the incoming fields. Later calls overwrite only the fields
/// supplied with a non-empty value.
pub struct SectionUpsertEngine<S: Section> {
    users: Arc<dyn UserDirectory>,
    sections: Arc<dyn SectionStore>,
    _kind: PhantomData<fn() -> S>,
}

impl<S: Section> SectionUpsertEngine<S> {
    pub fn new(users: Arc<dyn UserDirectory>, sections: Arc<dyn SectionStore>) -> Self {
        Self {
            users,
            sections,
            _kind: PhantomData,
        }
    }

    pub async fn upsert(
        &self,
        user_id: i64,
        incoming: &SectionFields,
    ) -> Result<SectionRecord, SectionError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(SectionError::UserNotFound(user_id))?;

        match self.sections.find_by_user(S::KIND, &user).await? {
            Some(existing) => self.merge_and_update(existing, incoming).await,
            None => self.create_default(&user, incoming).await,
        }
    }

    async fn create_default(
        &self,
        user: &UserIdentity,
        incoming: &SectionFields,
    ) -> Result<SectionRecord, SectionError> {
        let section = NewSection {
            user_id: user.user_id,
            kind: S::KIND,
            fields: S::default_content(),
        };

        match self.sections.insert(section).await {
            Ok(record) => {
                info!("Created default {} section for user {}", S::KIND, user.user_id);
                Ok(record)
            }
            Err(StoreError::UniqueViolation(constraint)) => {
                // Another call created the row first; continue as an update
                debug!(
                    "Lost create race on {} for user {} ({}), retrying as update",
                    S::KIND,
                    user.user_id,
                    constraint
                );
                let existing = self
                    .sections
                    .find_by_user(S::KIND, user)
                    .await?
                    .ok_or(SectionError::Conflict(S::KIND))?;
                self.merge_and_update(existing, incoming).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn merge_and_update(
        &self,
        mut record: SectionRecord,
        incoming: &SectionFields,
    ) -> Result<SectionRecord, SectionError> {
        record.fields.merge(S::FIELDS, incoming);
        self.sections.update(&record).await?;

        debug!("Updated {} section {} for user {}", S::KIND, record.id, record.user_id);
        Ok(record)
    }
}
