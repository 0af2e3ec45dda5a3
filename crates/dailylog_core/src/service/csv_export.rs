//! CSV export of the report collection.
//!
//! # Invariants
//! - Column order is fixed by `CSV_COLUMNS`; the header row comes first.
//! - Rows follow the collection order; nothing is sorted.
//! - A field is quoted only when it contains `,`, `"` or `\n`.
//! - Lines are joined with `\n` and there is no trailing newline.

use crate::model::coerce::format_count;
use crate::model::report::Report;
use std::borrow::Cow;

pub const CSV_COLUMNS: [&str; 9] = [
    "date",
    "staff",
    "place",
    "contracts",
    "details",
    "good",
    "issue",
    "next",
    "createdAt",
];

/// Renders `reports` as CSV text, header included.
pub fn reports_to_csv(reports: &[Report]) -> String {
    let mut lines = Vec::with_capacity(reports.len() + 1);
    lines.push(CSV_COLUMNS.join(","));
    for report in reports {
        let row = row_values(report)
            .iter()
            .map(|value| csv_escape(value))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

/// Quotes `value` when it contains a comma, double quote or newline.
pub fn csv_escape(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn row_values(report: &Report) -> [Cow<'_, str>; 9] {
    [
        Cow::Borrowed(report.date.as_str()),
        Cow::Borrowed(report.staff.as_str()),
        Cow::Borrowed(report.place.as_str()),
        Cow::Owned(format_count(report.contracts)),
        Cow::Borrowed(report.details.as_str()),
        Cow::Borrowed(report.good.as_str()),
        Cow::Borrowed(report.issue.as_str()),
        Cow::Borrowed(report.next.as_str()),
        Cow::Borrowed(report.created_at.as_str()),
    ]
}

#[cfg(test)]
mod tests {
    use super::{csv_escape, reports_to_csv};
    use crate::model::report::Report;
    use uuid::Uuid;

    fn sample() -> Report {
        Report {
            id: Uuid::new_v4(),
            date: "2024-01-01".to_string(),
            staff: "A, B".to_string(),
            place: String::new(),
            contracts: 2.0,
            details: "has \"quote\"".to_string(),
            good: String::new(),
            issue: String::new(),
            next: String::new(),
            created_at: "t".to_string(),
        }
    }

    #[test]
    fn empty_collection_is_header_only() {
        assert_eq!(
            reports_to_csv(&[]),
            "date,staff,place,contracts,details,good,issue,next,createdAt"
        );
    }

    #[test]
    fn quotes_commas_and_doubles_inner_quotes() {
        let csv = reports_to_csv(&[sample()]);
        let mut lines = csv.lines();
        lines.next();
        assert_eq!(
            lines.next(),
            Some(r#"2024-01-01,"A, B",,2,"has ""quote""",,,,t"#)
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn contracts_use_plain_number_text() {
        let mut fractional = sample();
        fractional.staff = "Ann".to_string();
        fractional.details = String::new();
        fractional.contracts = 1.5;
        let csv = reports_to_csv(&[sample(), fractional]);
        let rows = csv.lines().skip(1).collect::<Vec<_>>();
        assert!(rows[0].contains(",2,"));
        assert_eq!(rows[1], "2024-01-01,Ann,,1.5,,,,,t");
    }

    #[test]
    fn escape_only_touches_special_fields() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
        assert_eq!(csv_escape("a\rb"), "a\rb");
        assert_eq!(csv_escape(""), "");
    }
}
