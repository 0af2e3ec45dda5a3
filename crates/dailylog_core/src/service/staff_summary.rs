//! Per-staff aggregation over reports.
//!
//! Groups by trimmed staff name (case-sensitive), skips blank names, applies
//! an optional case-insensitive substring filter, and orders groups by
//! contract total descending. Ties keep first-seen order.

use crate::model::report::Report;
use std::collections::HashMap;

/// Totals for one staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffSummary {
    pub staff: String,
    /// Number of reports filed.
    pub count: usize,
    /// Sum of `contracts` over those reports.
    pub contracts: f64,
}

/// Normalizes a user-typed filter; blank input means "no filter".
pub fn normalize_staff_filter(filter: Option<&str>) -> Option<String> {
    let trimmed = filter?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

pub fn summarize(reports: &[Report], filter: Option<&str>) -> Vec<StaffSummary> {
    let needle = normalize_staff_filter(filter);
    let mut groups: Vec<StaffSummary> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();

    for report in reports {
        let name = report.staff.trim();
        if name.is_empty() {
            continue;
        }
        if let Some(needle) = needle.as_deref() {
            if !name.to_lowercase().contains(needle) {
                continue;
            }
        }

        let index = *index_by_name.entry(name).or_insert_with(|| {
            groups.push(StaffSummary {
                staff: name.to_string(),
                count: 0,
                contracts: 0.0,
            });
            groups.len() - 1
        });
        let group = &mut groups[index];
        group.count += 1;
        group.contracts += report.contracts;
    }

    // `sort_by` is stable, so equal totals stay in first-seen order.
    groups.sort_by(|left, right| right.contracts.total_cmp(&left.contracts));
    groups
}

#[cfg(test)]
mod tests {
    use super::{normalize_staff_filter, summarize, StaffSummary};
    use crate::model::report::Report;
    use uuid::Uuid;

    fn report(staff: &str, contracts: f64) -> Report {
        Report {
            id: Uuid::new_v4(),
            date: String::new(),
            staff: staff.to_string(),
            place: String::new(),
            contracts,
            details: String::new(),
            good: String::new(),
            issue: String::new(),
            next: String::new(),
            created_at: String::new(),
        }
    }

    fn summary(staff: &str, count: usize, contracts: f64) -> StaffSummary {
        StaffSummary {
            staff: staff.to_string(),
            count,
            contracts,
        }
    }

    #[test]
    fn groups_and_orders_by_contract_total() {
        let reports = vec![report("Ann", 2.0), report("Bob", 5.0), report("Ann", 1.0)];
        assert_eq!(
            summarize(&reports, None),
            vec![summary("Bob", 1, 5.0), summary("Ann", 2, 3.0)]
        );
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let reports = vec![report("Ann", 2.0), report("Bob", 5.0), report("Ann", 1.0)];
        assert_eq!(summarize(&reports, Some("an")), vec![summary("Ann", 2, 3.0)]);
        assert_eq!(summarize(&reports, Some(" BO ")), vec![summary("Bob", 1, 5.0)]);
    }

    #[test]
    fn blank_staff_is_skipped_and_names_are_trimmed() {
        let reports = vec![report("  ", 9.0), report(" Ann ", 1.0), report("Ann", 1.0)];
        assert_eq!(summarize(&reports, None), vec![summary("Ann", 2, 2.0)]);
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let reports = vec![report("Ann", 1.0), report("ann", 1.0)];
        assert_eq!(
            summarize(&reports, Some("ANN")),
            vec![summary("Ann", 1, 1.0), summary("ann", 1, 1.0)]
        );
    }

    #[test]
    fn fractional_counts_are_summed_exactly() {
        let reports = vec![report("Ann", 1.5), report("Ann", 1.5), report("Bob", 2.5)];
        assert_eq!(
            summarize(&reports, None),
            vec![summary("Ann", 2, 3.0), summary("Bob", 1, 2.5)]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let reports = vec![report("Cy", 1.0), report("Ann", 1.0), report("Bob", 1.0)];
        let names = summarize(&reports, None)
            .into_iter()
            .map(|row| row.staff)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Cy", "Ann", "Bob"]);
    }

    #[test]
    fn blank_filter_means_no_filter() {
        assert_eq!(normalize_staff_filter(Some("   ")), None);
        assert_eq!(normalize_staff_filter(None), None);
        assert_eq!(normalize_staff_filter(Some(" AnN ")).as_deref(), Some("ann"));
    }
}
