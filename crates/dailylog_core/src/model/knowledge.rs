//! Free-form knowledge note record.
//!
//! # Invariants
//! - `title` and `body` are stored trimmed and are never empty for records
//!   created through `KnowledgeEntry::from_draft`.

use crate::model::coerce::deserialize_text;
use crate::model::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// Storage key of the knowledge collection.
pub const KNOWLEDGE_STORAGE_KEY: &str = "daily_knowledge_v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEntry {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub body: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub created_at: String,
}

/// Raw knowledge input as submitted by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeDraft {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl KnowledgeDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Collects a draft from form `(name, value)` pairs; first value wins.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut draft = Self::default();
        for (name, value) in fields {
            let slot = match name.as_ref() {
                "title" => &mut draft.title,
                "body" => &mut draft.body,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        draft
    }
}

impl Record for KnowledgeEntry {
    type Draft = KnowledgeDraft;

    const STORAGE_KEY: &'static str = KNOWLEDGE_STORAGE_KEY;
    const KIND: &'static str = "knowledge";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(draft: KnowledgeDraft, id: RecordId, created_at: String) -> Option<Self> {
        let title = draft.title.as_deref().unwrap_or_default().trim();
        let body = draft.body.as_deref().unwrap_or_default().trim();
        if title.is_empty() || body.is_empty() {
            return None;
        }

        Some(Self {
            id,
            title: title.to_string(),
            body: body.to_string(),
            created_at,
        })
    }
}
