//! Core domain logic for the daily report and knowledge log.
//! This crate is the single source of truth for record invariants,
//! persistence, staff aggregation and export formatting.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::coerce::{coerce_count, format_count};
pub use model::knowledge::{KnowledgeDraft, KnowledgeEntry, KNOWLEDGE_STORAGE_KEY};
pub use model::report::{Report, ReportDraft, REPORTS_STORAGE_KEY};
pub use model::{Record, RecordId};
pub use repo::{KnowledgeRepository, RepoError, RepoResult, ReportRepository, Repository};
pub use service::csv_export::{csv_escape, reports_to_csv, CSV_COLUMNS};
pub use service::daily_log::DailyLogService;
pub use service::html::escape_text;
pub use service::staff_summary::{normalize_staff_filter, summarize, StaffSummary};
pub use store::collection::{
    load_collection, read_collection, save_collection, CollectionLoad, DecodeError, SCHEMA_VERSION,
};
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
