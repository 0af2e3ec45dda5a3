//! Daily activity report record.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the repository, never by callers.
//! - Free-text fields are never absent; missing input becomes `""`.
//! - `staff` may be empty; such reports are skipped by staff aggregation.

use crate::model::coerce::{coerce_count, deserialize_count, deserialize_text, serialize_count};
use crate::model::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// Storage key of the report collection.
pub const REPORTS_STORAGE_KEY: &str = "daily_reports_v1";

/// One staff member's report for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: RecordId,
    /// Caller-supplied date text; not validated.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub date: String,
    /// Grouping key for staff summaries.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub staff: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub place: String,
    /// Number of contracts closed. Not range-checked; fractions are kept.
    #[serde(
        default,
        deserialize_with = "deserialize_count",
        serialize_with = "serialize_count"
    )]
    pub contracts: f64,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub details: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub good: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub issue: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub next: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub created_at: String,
}

/// Raw report input as submitted by a form.
///
/// Every field is optional text; coercion happens in `Report::from_draft`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDraft {
    pub date: Option<String>,
    pub staff: Option<String>,
    pub place: Option<String>,
    pub contracts: Option<String>,
    pub details: Option<String>,
    pub good: Option<String>,
    pub issue: Option<String>,
    pub next: Option<String>,
}

impl ReportDraft {
    /// Collects a draft from form `(name, value)` pairs.
    ///
    /// Unknown names are ignored. When a name repeats, the first value wins.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut draft = Self::default();
        for (name, value) in fields {
            let slot = match name.as_ref() {
                "date" => &mut draft.date,
                "staff" => &mut draft.staff,
                "place" => &mut draft.place,
                "contracts" => &mut draft.contracts,
                "details" => &mut draft.details,
                "good" => &mut draft.good,
                "issue" => &mut draft.issue,
                "next" => &mut draft.next,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        draft
    }
}

impl Record for Report {
    type Draft = ReportDraft;

    const STORAGE_KEY: &'static str = REPORTS_STORAGE_KEY;
    const KIND: &'static str = "report";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(draft: ReportDraft, id: RecordId, created_at: String) -> Option<Self> {
        Some(Self {
            id,
            date: draft.date.unwrap_or_default(),
            staff: draft.staff.unwrap_or_default(),
            place: draft.place.unwrap_or_default(),
            contracts: draft.contracts.as_deref().map_or(0.0, coerce_count),
            details: draft.details.unwrap_or_default(),
            good: draft.good.unwrap_or_default(),
            issue: draft.issue.unwrap_or_default(),
            next: draft.next.unwrap_or_default(),
            created_at,
        })
    }
}
