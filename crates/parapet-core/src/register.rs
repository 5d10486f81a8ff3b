//! The in-memory risk register: the session's system of record.
//!
//! The register is owned by the composition root and handed to the service
//! layer as a shared handle; nothing in this crate holds module-level state.
//! It is append-only for the lifetime of the process and is discarded on
//! exit. No update or delete operation exists.

use tracing::debug;

use crate::model::{RiskDraft, RiskRecord, RiskStatus, Severity};

/// Ordered collection of risk records, mutated only by append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskRegister {
    records: Vec<RiskRecord>,
}

impl RiskRegister {
    /// An empty register.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// The three fixed records every session starts with.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            records: vec![
                RiskRecord {
                    id: 1,
                    asset: "Customer DB".into(),
                    threat: "Ransomware".into(),
                    vuln: "Unpatched OS".into(),
                    impact: Severity::High,
                    likelihood: Severity::Medium,
                    status: RiskStatus::Open,
                },
                RiskRecord {
                    id: 2,
                    asset: "Payroll App".into(),
                    threat: "Credential Stuffing".into(),
                    vuln: "Weak MFA".into(),
                    impact: Severity::Medium,
                    likelihood: Severity::High,
                    status: RiskStatus::MitigationInProgress,
                },
                RiskRecord {
                    id: 3,
                    asset: "S3 Bucket".into(),
                    threat: "Data Leak".into(),
                    vuln: "Public ACL".into(),
                    impact: Severity::High,
                    likelihood: Severity::Low,
                    status: RiskStatus::Closed,
                },
            ],
        }
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the register holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// An independent copy of the current contents.
    ///
    /// Mutating the returned vector never affects the register.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RiskRecord> {
        self.records.clone()
    }

    /// The id the next appended record will receive: `max(existing, 0) + 1`.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    /// Append a new record built from `draft` and return it.
    ///
    /// The record's id is computed here and its status is forced to
    /// [`RiskStatus::Open`]; any status carried by the draft is discarded.
    /// The register grows by exactly one element.
    pub fn append(&mut self, draft: RiskDraft) -> RiskRecord {
        let record = RiskRecord {
            id: self.next_id(),
            asset: draft.asset,
            threat: draft.threat,
            vuln: draft.vuln,
            impact: draft.impact,
            likelihood: draft.likelihood,
            status: RiskStatus::Open,
        };
        debug!(id = record.id, asset = %record.asset, "appended risk record");
        self.records.push(record.clone());
        record
    }
}
