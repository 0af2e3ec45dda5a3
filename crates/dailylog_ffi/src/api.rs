//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose report, knowledge, summary and export operations to Dart via FRB.
//! - Translate raw form fields into core drafts and records into flat DTOs.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens the configured store, performs one operation and closes it.
//! - Lists are returned newest first.

use dailylog_core::db::open_db;
use dailylog_core::{
    core_version as core_version_inner, escape_text as escape_text_inner, format_count,
    init_logging as init_logging_inner, ping as ping_inner, reports_to_csv, DailyLogService,
    KnowledgeDraft, KnowledgeEntry, Report, ReportDraft, SqliteKvStore, StaffSummary,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

const STORAGE_DB_FILE_NAME: &str = "dailylog.sqlite3";
static STORAGE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Selects the SQLite file that backs both collections.
///
/// Must be an absolute path. Calling again with the same path is a no-op;
/// a different path is rejected once storage has been resolved. When never
/// called, storage lives in the OS temp directory.
///
/// # FFI contract
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_storage(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = Path::new(trimmed);
    if !requested.is_absolute() {
        return format!("db_path must be an absolute path, got `{trimmed}`");
    }

    let active = STORAGE_PATH.get_or_init(|| requested.to_path_buf());
    if active == requested {
        String::new()
    } else {
        format!(
            "storage already initialized at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One submitted form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// Generic action response envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Id of the created record, when one was created.
    pub record_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: Option<String>) -> Self {
        Self {
            ok: true,
            record_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// Report row for list rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportItem {
    pub id: String,
    pub date: String,
    pub staff: String,
    pub place: String,
    pub contracts: f64,
    /// `contracts` as display text (`2`, `1.5`).
    pub contracts_text: String,
    pub details: String,
    pub good: String,
    pub issue: String,
    pub next: String,
    pub created_at: String,
}

/// Knowledge row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

/// One row of the staff summary view.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffSummaryItem {
    pub staff: String,
    pub count: u32,
    pub contracts: f64,
    /// `contracts` as display text (`2`, `1.5`).
    pub contracts_text: String,
}

/// Creates a report from submitted form fields.
///
/// Missing fields become empty text; a non-numeric `contracts` becomes 0.
#[flutter_rust_bridge::frb(sync)]
pub fn report_add(fields: Vec<FormField>) -> ActionResponse {
    let draft = ReportDraft::from_fields(fields.into_iter().map(|f| (f.name, f.value)));
    let result = with_service(|service| {
        service
            .reports_mut()
            .add(draft)
            .map_err(|err| err.to_string())
    });
    // Report drafts are never rejected, so `Ok` always carries the new record.
    match result {
        Ok(created) => ActionResponse::success(
            "Report saved.",
            created.map(|report| report.id.to_string()),
        ),
        Err(err) => ActionResponse::failure(format!("report_add failed: {err}")),
    }
}

/// Deletes one report by id. Unknown or malformed ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn report_remove(id: String) -> ActionResponse {
    let Some(record_id) = parse_record_id(&id) else {
        return ActionResponse::success("Nothing to remove.", None);
    };
    match with_service(|service| {
        service
            .reports_mut()
            .remove(record_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(true) => ActionResponse::success("Report removed.", None),
        Ok(false) => ActionResponse::success("Nothing to remove.", None),
        Err(err) => ActionResponse::failure(format!("report_remove failed: {err}")),
    }
}

/// Deletes every report. The caller must have confirmed with the user.
#[flutter_rust_bridge::frb(sync)]
pub fn report_clear() -> ActionResponse {
    match with_service(|service| service.reports_mut().clear().map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("All reports removed.", None),
        Err(err) => ActionResponse::failure(format!("report_clear failed: {err}")),
    }
}

/// Lists reports newest first. Storage failures yield an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn report_list() -> Vec<ReportItem> {
    with_service(|service| {
        Ok(service
            .recent_reports()
            .into_iter()
            .map(to_report_item)
            .collect())
    })
    .unwrap_or_else(|err| {
        warn!("event=report_list module=ffi status=degraded error={err}");
        Vec::new()
    })
}

/// Creates a knowledge entry; blank title or body is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn knowledge_add(fields: Vec<FormField>) -> ActionResponse {
    let draft = KnowledgeDraft::from_fields(fields.into_iter().map(|f| (f.name, f.value)));
    let result = with_service(|service| {
        service
            .knowledge_mut()
            .add(draft)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(Some(entry)) => ActionResponse::success("Knowledge saved.", Some(entry.id.to_string())),
        Ok(None) => ActionResponse::failure("Title and body are required."),
        Err(err) => ActionResponse::failure(format!("knowledge_add failed: {err}")),
    }
}

/// Deletes one knowledge entry by id. Unknown or malformed ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn knowledge_remove(id: String) -> ActionResponse {
    let Some(record_id) = parse_record_id(&id) else {
        return ActionResponse::success("Nothing to remove.", None);
    };
    match with_service(|service| {
        service
            .knowledge_mut()
            .remove(record_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(true) => ActionResponse::success("Knowledge removed.", None),
        Ok(false) => ActionResponse::success("Nothing to remove.", None),
        Err(err) => ActionResponse::failure(format!("knowledge_remove failed: {err}")),
    }
}

/// Deletes every knowledge entry. The caller must have confirmed with the user.
#[flutter_rust_bridge::frb(sync)]
pub fn knowledge_clear() -> ActionResponse {
    match with_service(|service| service.knowledge_mut().clear().map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("All knowledge removed.", None),
        Err(err) => ActionResponse::failure(format!("knowledge_clear failed: {err}")),
    }
}

/// Lists knowledge entries newest first. Storage failures yield an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn knowledge_list() -> Vec<KnowledgeItem> {
    with_service(|service| {
        Ok(service
            .recent_knowledge()
            .into_iter()
            .map(to_knowledge_item)
            .collect())
    })
    .unwrap_or_else(|err| {
        warn!("event=knowledge_list module=ffi status=degraded error={err}");
        Vec::new()
    })
}

/// Per-staff totals, filtered by a case-insensitive name substring.
///
/// A blank filter returns every staff member.
#[flutter_rust_bridge::frb(sync)]
pub fn staff_summary(filter: String) -> Vec<StaffSummaryItem> {
    with_service(|service| {
        Ok(service
            .staff_summary(Some(filter.as_str()))
            .into_iter()
            .map(to_staff_summary_item)
            .collect())
    })
    .unwrap_or_else(|err| {
        warn!("event=staff_summary module=ffi status=degraded error={err}");
        Vec::new()
    })
}

/// CSV text of all reports. Storage failures yield the header row only.
///
/// Copying the text to the clipboard is left to the UI.
#[flutter_rust_bridge::frb(sync)]
pub fn export_csv() -> String {
    with_service(|service| Ok(service.export_csv())).unwrap_or_else(|err| {
        warn!("event=export_csv module=ffi status=degraded error={err}");
        reports_to_csv(&[])
    })
}

/// HTML-escapes user text before it is placed in markup.
#[flutter_rust_bridge::frb(sync)]
pub fn escape_text(text: String) -> String {
    escape_text_inner(text.as_str())
}

fn resolve_storage_path() -> PathBuf {
    STORAGE_PATH
        .get_or_init(|| std::env::temp_dir().join(STORAGE_DB_FILE_NAME))
        .clone()
}

fn with_service<T>(
    f: impl FnOnce(&mut DailyLogService<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_storage_path();
    let conn = open_db(&db_path).map_err(|err| format!("storage open failed: {err}"))?;
    let store =
        SqliteKvStore::try_new(&conn).map_err(|err| format!("storage init failed: {err}"))?;
    let mut service = DailyLogService::load(&store);
    f(&mut service)
}

fn parse_record_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn to_report_item(report: &Report) -> ReportItem {
    ReportItem {
        id: report.id.to_string(),
        date: report.date.clone(),
        staff: report.staff.clone(),
        place: report.place.clone(),
        contracts: report.contracts,
        contracts_text: format_count(report.contracts),
        details: report.details.clone(),
        good: report.good.clone(),
        issue: report.issue.clone(),
        next: report.next.clone(),
        created_at: report.created_at.clone(),
    }
}

fn to_knowledge_item(entry: &KnowledgeEntry) -> KnowledgeItem {
    KnowledgeItem {
        id: entry.id.to_string(),
        title: entry.title.clone(),
        body: entry.body.clone(),
        created_at: entry.created_at.clone(),
    }
}

fn to_staff_summary_item(summary: StaffSummary) -> StaffSummaryItem {
    StaffSummaryItem {
        staff: summary.staff,
        count: u32::try_from(summary.count).unwrap_or(u32::MAX),
        contracts: summary.contracts,
        contracts_text: format_count(summary.contracts),
    }
}
