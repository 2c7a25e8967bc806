pub mod engine;
pub mod kinds;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use engine::{SectionError, SectionUpsertEngine};
pub use kinds::{default_content, Contact, Detail, Footer, Hero, Nav, Slider};

/// The six content blocks a user's site is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    Nav,
    Footer,
    Contact,
    Detail,
    Slider,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Hero,
        SectionKind::Nav,
        SectionKind::Footer,
        SectionKind::Contact,
        SectionKind::Detail,
        SectionKind::Slider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Nav => "nav",
            SectionKind::Footer => "footer",
            SectionKind::Contact => "contact",
            SectionKind::Detail => "detail",
            SectionKind::Slider => "slider",
        }
    }

    /// Backing table; one row per user, `user_id` is unique.
    pub fn table(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero_section",
            SectionKind::Nav => "nav_section",
            SectionKind::Footer => "footer_section",
            SectionKind::Contact => "contact_section",
            SectionKind::Detail => "detail_section",
            SectionKind::Slider => "slider_section",
        }
    }

    /// Content columns, in storage order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            SectionKind::Hero => Hero::FIELDS,
            SectionKind::Nav => Nav::FIELDS,
            SectionKind::Footer => Footer::FIELDS,
            SectionKind::Contact => Contact::FIELDS,
            SectionKind::Detail => Detail::FIELDS,
            SectionKind::Slider => Slider::FIELDS,
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compile-time descriptor for one section kind: its field list and the
/// content a user gets the first time the section is touched.
pub trait Section: Send + Sync + 'static {
    const KIND: SectionKind;
    const FIELDS: &'static [&'static str];

    fn default_content() -> SectionFields;
}

/// Field name -> string value. Values are opaque (mostly JSON UI trees).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionFields(BTreeMap<String, String>);

impl SectionFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrites each of `fields` with the incoming value when that value is
    /// present and non-empty. Nothing is ever cleared.
    pub fn merge(&mut self, fields: &[&str], incoming: &SectionFields) {
        for field in fields {
            if let Some(value) = incoming.get(field).filter(|v| !v.is_empty()) {
                self.set(*field, value);
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SectionFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A stored section row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub id: i64,
    pub user_id: i64,
    pub kind: SectionKind,
    pub fields: SectionFields,
}

/// A section that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewSection {
    pub user_id: i64,
    pub kind: SectionKind,
    pub fields: SectionFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_stored_value_for_empty_or_missing_fields() {
        let mut stored = SectionFields::new()
            .with("split", "old-split")
            .with("centered", "old-centered")
            .with("active", "Split");
        let incoming = SectionFields::new().with("active", "").with("split", "X");

        stored.merge(Hero::FIELDS, &incoming);

        assert_eq!(stored.get("active"), Some("Split"));
        assert_eq!(stored.get("split"), Some("X"));
        assert_eq!(stored.get("centered"), Some("old-centered"));
    }

    #[test]
    fn merge_ignores_fields_outside_the_kind() {
        let mut stored = SectionFields::new().with("basic", "b");
        let incoming = SectionFields::new().with("active", "Basic").with("basic", "c");

        stored.merge(Slider::FIELDS, &incoming);

        assert_eq!(stored.get("basic"), Some("c"));
        assert_eq!(stored.get("active"), None);
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn kinds_map_to_distinct_tables() {
        let mut tables: Vec<_> = SectionKind::ALL.iter().map(|k| k.table()).collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), SectionKind::ALL.len());
    }
}
