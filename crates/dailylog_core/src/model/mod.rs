//! Domain records for daily reports and knowledge notes.
//!
//! # Responsibility
//! - Define the two persisted record shapes and their drafts.
//! - Own field coercion from raw form input.
//!
//! # Invariants
//! - Every record is identified by a `RecordId` assigned at creation.
//! - Records are never mutated after creation; there is no update path.
//! - Serialized field names match the browser tool's storage layout.

pub mod coerce;
pub mod knowledge;
pub mod report;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Stable identifier shared by both record collections.
pub type RecordId = Uuid;

/// Behavior a persisted record type provides to the generic repository.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Raw, uncoerced input a record is built from.
    type Draft;

    /// Storage key of the collection holding this record type.
    const STORAGE_KEY: &'static str;

    /// Short label used in log events.
    const KIND: &'static str;

    fn id(&self) -> RecordId;

    /// Builds a record from a draft, or returns `None` when the draft is rejected.
    fn from_draft(draft: Self::Draft, id: RecordId, created_at: String) -> Option<Self>;
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
