//! CSV export of the risk register.
//!
//! Serializes the *unfiltered* snapshot: a fixed header row, then one row
//! per record. Free-text columns (asset, threat, vulnerability) are
//! double-quoted with embedded quotes doubled; the id and enum columns are
//! emitted bare since their value space cannot contain a comma.

use std::io::{self, Write};

use crate::model::RiskRecord;

/// Fixed header row of the exported table.
pub const CSV_HEADER: &str = "ID,Asset,Threat,Vulnerability,Impact,Likelihood,Status";

/// Default file name for saved exports.
pub const DEFAULT_EXPORT_FILE: &str = "risk_register.csv";

/// Quote a free-text field, doubling any embedded quote characters.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// One CSV row for a record, without a trailing newline.
#[must_use]
pub fn csv_row(record: &RiskRecord) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        record.id,
        quoted(&record.asset),
        quoted(&record.threat),
        quoted(&record.vuln),
        record.impact,
        record.likelihood,
        record.status
    )
}

/// Render the snapshot as a CSV document, or `None` when there is nothing
/// to export (the operation is a no-op on an empty or absent snapshot).
#[must_use]
pub fn render_csv(records: &[RiskRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let mut out = String::from(CSV_HEADER);
    for record in records {
        out.push('\n');
        out.push_str(&csv_row(record));
    }
    Some(out)
}

/// Write the rendered CSV (with a trailing newline) to `w`.
///
/// Returns `false` without writing anything when the snapshot is empty.
pub fn write_csv(records: &[RiskRecord], w: &mut dyn Write) -> io::Result<bool> {
    match render_csv(records) {
        Some(csv) => {
            writeln!(w, "{csv}")?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskDraft, Severity};
    use crate::register::RiskRegister;

    #[test]
    fn seeded_export_is_header_plus_three_rows() {
        let snap = RiskRegister::seeded().snapshot();
        let csv = render_csv(&snap).expect("seeded snapshot is non-empty");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER);
        for line in &lines[1..] {
            assert_eq!(line.matches(',').count(), 6, "7 fields per row: {line}");
        }
    }

    #[test]
    fn rows_quote_text_fields_and_leave_enums_bare() {
        let snap = RiskRegister::seeded().snapshot();
        let csv = render_csv(&snap).expect("non-empty");
        let first = csv.lines().nth(1).expect("first data row");
        assert_eq!(
            first,
            "1,\"Customer DB\",\"Ransomware\",\"Unpatched OS\",High,Medium,Open"
        );
        let second = csv.lines().nth(2).expect("second data row");
        assert!(second.ends_with("Medium,High,Mitigation in progress"));
    }

    #[test]
    fn empty_snapshot_is_a_no_op() {
        assert_eq!(render_csv(&[]), None);
        let mut buf = Vec::new();
        assert!(!write_csv(&[], &mut buf).expect("write never fails on a Vec"));
        assert!(buf.is_empty());
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let mut reg = RiskRegister::new();
        reg.append(RiskDraft::new(
            "the \"crown jewels\" DB",
            "Insider",
            "Shared creds, no rotation",
            Severity::High,
            Severity::Low,
        ));
        let csv = render_csv(&reg.snapshot()).expect("non-empty");
        let row = csv.lines().nth(1).expect("data row");
        assert!(row.contains("\"the \"\"crown jewels\"\" DB\""));
        // The comma inside the vuln text stays inside its quotes.
        assert!(row.contains("\"Shared creds, no rotation\""));
    }

    #[test]
    fn write_csv_appends_trailing_newline() {
        let snap = RiskRegister::seeded().snapshot();
        let mut buf = Vec::new();
        assert!(write_csv(&snap, &mut buf).expect("write succeeds"));
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 4);
    }
}
