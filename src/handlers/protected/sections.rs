// handlers/protected/sections.rs - POST /api/sections/{kind} handlers
//
// One generic handler serves every section kind; the route table instantiates
// it per kind (`update_section::<Hero>`, `update_section::<Nav>`, ...).

use std::collections::BTreeMap;

use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::sections::{Section, SectionFields, SectionRecord, SectionUpsertEngine};
use crate::types::UserIdentity;

/// User key as sent by clients; older clients send the numeric id as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserKey {
    Number(i64),
    Text(String),
}

impl UserKey {
    pub fn parse(&self) -> Result<i64, ApiError> {
        match self {
            UserKey::Number(id) => Ok(*id),
            UserKey::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ApiError::internal_server_error("Invalid user id")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SectionUpdateRequest {
    #[serde(default)]
    pub id: Option<UserKey>,
    /// Everything else in the body, undecoded
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl SectionUpdateRequest {
    /// Incoming values for the kind's own fields. Other keys are ignored and
    /// `null` counts as absent; a non-string value for a known field is malformed.
    pub fn section_fields(&self, known: &[&str]) -> Result<SectionFields, ApiError> {
        let mut fields = SectionFields::new();
        for name in known {
            match self.fields.get(*name) {
                None | Some(Value::Null) => {}
                Some(Value::String(value)) => fields.set(*name, value.as_str()),
                Some(_) => {
                    tracing::debug!("Rejected non-string value for section field '{}'", name);
                    return Err(ApiError::internal_server_error(format!(
                        "Field '{}' must be a string",
                        name
                    )));
                }
            }
        }
        Ok(fields)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub fields: SectionFields,
}

impl From<SectionRecord> for SectionResponse {
    fn from(record: SectionRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            fields: record.fields,
        }
    }
}

/// POST /api/sections/:kind - Get-or-create-and-merge the caller's section
///
/// Expected Input (all fields optional):
/// ```json
/// { "id": "1", "split": "{...}", "centered": "", "active": "Centered" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": { "id": 4, "userId": 1, "split": "{...}", "centered": "{...}", "active": "Centered" }
/// }
/// ```
///
/// Expected Output (id names another user, 401):
/// ```json
/// { "success": false, "error": "Token does not grant access to this user", "code": "UNAUTHORIZED" }
/// ```
///
/// The section is always scoped to the token's user; a mismatched `id` is
/// rejected, never ignored. Empty strings and `null` keep the stored value,
/// keys outside the kind's field list are ignored, and a non-string value for
/// one of the kind's fields is a 500.
pub async fn update_section<S: Section>(
    State(state): State<AppState>,
    Extension(caller): Extension<UserIdentity>,
    JsonBody(request): JsonBody<SectionUpdateRequest>,
) -> ApiResult<SectionResponse> {
    if let Some(key) = &request.id {
        let requested = key.parse()?;
        if requested != caller.user_id {
            tracing::warn!(
                "User {} attempted to update {} section of user {}",
                caller.user_id,
                S::KIND,
                requested
            );
            return Err(ApiError::unauthorized("Token does not grant access to this user"));
        }
    }

    let incoming = request.section_fields(S::FIELDS)?;

    let engine = SectionUpsertEngine::<S>::new(state.stores.users.clone(), state.stores.sections.clone());
    let record = engine.upsert(caller.user_id, &incoming).await?;

    Ok(ApiResponse::success(record.into()))
}
