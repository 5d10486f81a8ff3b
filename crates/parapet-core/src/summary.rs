//! Dashboard projections: framework/domain coverage and the live status
//! breakdown computed from a snapshot.
//!
//! Coverage numbers are session-static seed data; only the status breakdown
//! reflects the current register contents.

use serde::Serialize;

use crate::model::{RiskRecord, RiskStatus};

/// Overall audit readiness shown on the dashboard.
pub const AUDIT_READINESS_PERCENT: u16 = 72;

/// Control coverage for one compliance framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameworkCoverage {
    pub framework: &'static str,
    pub percent: u16,
}

/// Framework coverage cards, in display order.
#[must_use]
pub const fn framework_coverage() -> [FrameworkCoverage; 3] {
    [
        FrameworkCoverage {
            framework: "ISO/IEC 27001",
            percent: 62,
        },
        FrameworkCoverage {
            framework: "PCI DSS v4.0",
            percent: 78,
        },
        FrameworkCoverage {
            framework: "GDPR",
            percent: 55,
        },
    ]
}

/// Control coverage for one top-level domain/category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DomainCoverage {
    pub domain: &'static str,
    pub percent: u16,
}

/// Domain coverage bars, in display order.
#[must_use]
pub const fn domain_coverage() -> [DomainCoverage; 4] {
    [
        DomainCoverage {
            domain: "Access",
            percent: 82,
        },
        DomainCoverage {
            domain: "Asset",
            percent: 71,
        },
        DomainCoverage {
            domain: "Crypto",
            percent: 63,
        },
        DomainCoverage {
            domain: "Ops",
            percent: 58,
        },
    ]
}

/// Record counts per lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl StatusBreakdown {
    /// Count the records in `snapshot` by status.
    #[must_use]
    pub fn of(snapshot: &[RiskRecord]) -> Self {
        let mut breakdown = Self::default();
        for record in snapshot {
            match record.status {
                RiskStatus::Open => breakdown.open += 1,
                RiskStatus::MitigationInProgress => breakdown.in_progress += 1,
                RiskStatus::Closed => breakdown.closed += 1,
            }
        }
        breakdown
    }

    /// Total records counted.
    #[must_use]
    pub const fn total(self) -> usize {
        self.open + self.in_progress + self.closed
    }
}
