//! Client-side substring filtering over risk snapshots.
//!
//! Purely a projection: filtering never touches the register, and the view
//! recomputes it whenever the query string or the snapshot changes.

use crate::model::RiskRecord;

/// Whether `query` case-insensitively matches any part of the record's
/// concatenated field values. An empty query matches everything.
#[must_use]
pub fn matches(record: &RiskRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    record.haystack().contains(&query.to_ascii_lowercase())
}

/// Apply the filter to a snapshot, returning the matching records.
#[must_use]
pub fn apply(records: &[RiskRecord], query: &str) -> Vec<RiskRecord> {
    records
        .iter()
        .filter(|record| matches(record, query))
        .cloned()
        .collect()
}
