//! Read-side derivations and the application context.
//!
//! # Responsibility
//! - Derive staff summaries and CSV exports from the report collection.
//! - Provide HTML-safe escaping for rendering user text.
//! - Bundle both repositories behind one owner (`DailyLogService`).
//!
//! # Invariants
//! - Derivations never mutate repository state.

pub mod csv_export;
pub mod daily_log;
pub mod html;
pub mod staff_summary;
