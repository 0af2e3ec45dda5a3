//! Application context owning both record repositories.
//!
//! # Responsibility
//! - Load reports and knowledge entries from one store.
//! - Expose summary and export views over the current report state.

use crate::model::knowledge::KnowledgeEntry;
use crate::model::report::Report;
use crate::repo::{KnowledgeRepository, ReportRepository};
use crate::service::csv_export::reports_to_csv;
use crate::service::staff_summary::{summarize, StaffSummary};
use crate::store::KeyValueStore;

/// Owner of the report and knowledge collections for one session.
pub struct DailyLogService<'s> {
    reports: ReportRepository<'s>,
    knowledge: KnowledgeRepository<'s>,
}

impl<'s> DailyLogService<'s> {
    /// Loads both collections from `store`.
    pub fn load(store: &'s dyn KeyValueStore) -> Self {
        Self {
            reports: ReportRepository::load(store),
            knowledge: KnowledgeRepository::load(store),
        }
    }

    pub fn reports(&self) -> &ReportRepository<'s> {
        &self.reports
    }

    pub fn reports_mut(&mut self) -> &mut ReportRepository<'s> {
        &mut self.reports
    }

    pub fn knowledge(&self) -> &KnowledgeRepository<'s> {
        &self.knowledge
    }

    pub fn knowledge_mut(&mut self) -> &mut KnowledgeRepository<'s> {
        &mut self.knowledge
    }

    /// Staff totals over all reports, optionally filtered by name substring.
    pub fn staff_summary(&self, filter: Option<&str>) -> Vec<StaffSummary> {
        summarize(self.reports.list(), filter)
    }

    /// CSV text of all reports in insertion order.
    pub fn export_csv(&self) -> String {
        reports_to_csv(self.reports.list())
    }

    /// Newest-first reports, as lists display them.
    pub fn recent_reports(&self) -> Vec<&Report> {
        self.reports.list_recent().collect()
    }

    /// Newest-first knowledge entries, as lists display them.
    pub fn recent_knowledge(&self) -> Vec<&KnowledgeEntry> {
        self.knowledge.list_recent().collect()
    }
}
