use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::CoreError;

/// Severity scale shared by impact and likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// The wire string, exactly as it appears in CSV and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// All severities in ascending order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    /// The next severity in ascending order, wrapping at the top.
    ///
    /// Used by interactive pickers cycling through the scale.
    #[must_use]
    pub const fn cycled(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    /// Parse a severity label. Accepts any casing of `Low`/`Medium`/`High`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(CoreError::InvalidEnumValue {
                field: "severity",
                value: s.to_string(),
            }),
        }
    }
}

/// Lifecycle status of a risk record.
///
/// Records are always created `Open`; the register enforces this regardless
/// of any caller-supplied status (see [`crate::register::RiskRegister::append`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    Open,
    #[serde(rename = "Mitigation in progress")]
    MitigationInProgress,
    Closed,
}

impl RiskStatus {
    /// The wire string, exactly as it appears in CSV and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::MitigationInProgress => "Mitigation in progress",
            Self::Closed => "Closed",
        }
    }

    /// All statuses in lifecycle order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Open, Self::MitigationInProgress, Self::Closed]
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "mitigation in progress" => Ok(Self::MitigationInProgress),
            "closed" => Ok(Self::Closed),
            _ => Err(CoreError::InvalidEnumValue {
                field: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// A fully materialized risk record as held by the register.
///
/// `id` is positive, unique within the register, and monotonically
/// increasing; it is computed at insertion time, never supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub id: u64,
    pub asset: String,
    pub threat: String,
    pub vuln: String,
    pub impact: Severity,
    pub likelihood: Severity,
    pub status: RiskStatus,
}

impl RiskRecord {
    /// All field values concatenated for substring filtering, lowercased.
    #[must_use]
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.id, self.asset, self.threat, self.vuln, self.impact, self.likelihood, self.status
        )
        .to_ascii_lowercase()
    }
}

/// Caller-supplied fields for a new record.
///
/// A draft may carry a status, but the register discards it: created records
/// always start [`RiskStatus::Open`]. The field exists so the contract is
/// explicit and testable rather than an accident of field spreading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDraft {
    pub asset: String,
    pub threat: String,
    pub vuln: String,
    pub impact: Severity,
    pub likelihood: Severity,
    /// Ignored on append; see [`crate::register::RiskRegister::append`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RiskStatus>,
}

impl RiskDraft {
    /// Convenience constructor for the common no-status case.
    #[must_use]
    pub fn new(
        asset: impl Into<String>,
        threat: impl Into<String>,
        vuln: impl Into<String>,
        impact: Severity,
        likelihood: Severity,
    ) -> Self {
        Self {
            asset: asset.into(),
            threat: threat.into(),
            vuln: vuln.into(),
            impact,
            likelihood,
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Severity ────────────────────────────────────────────────────────────

    #[test]
    fn severity_roundtrip_via_as_str() {
        for sev in Severity::all() {
            let parsed: Severity = sev.as_str().parse().expect("wire string should parse");
            assert_eq!(sev, parsed);
        }
    }

    #[test]
    fn severity_parse_is_case_insensitive() {
        assert_eq!("low".parse::<Severity>().expect("parses"), Severity::Low);
        assert_eq!("HIGH".parse::<Severity>().expect("parses"), Severity::High);
    }

    #[test]
    fn severity_parse_rejects_unknown() {
        assert!("critical".parse::<Severity>().is_err());
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_cycled_wraps() {
        assert_eq!(Severity::Low.cycled(), Severity::Medium);
        assert_eq!(Severity::Medium.cycled(), Severity::High);
        assert_eq!(Severity::High.cycled(), Severity::Low);
    }

    // ── RiskStatus ──────────────────────────────────────────────────────────

    #[test]
    fn status_wire_strings_match_display() {
        assert_eq!(RiskStatus::Open.to_string(), "Open");
        assert_eq!(
            RiskStatus::MitigationInProgress.to_string(),
            "Mitigation in progress"
        );
        assert_eq!(RiskStatus::Closed.to_string(), "Closed");
    }

    #[test]
    fn status_serde_matches_as_str() {
        for status in RiskStatus::all() {
            let json = serde_json::to_string(&status).expect("serializes");
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn status_roundtrip_via_as_str() {
        for status in RiskStatus::all() {
            let parsed: RiskStatus = status.as_str().parse().expect("wire string should parse");
            assert_eq!(status, parsed);
        }
    }

    // ── RiskRecord / RiskDraft ──────────────────────────────────────────────

    #[test]
    fn record_serde_roundtrip() {
        let record = RiskRecord {
            id: 7,
            asset: "Customer DB".into(),
            threat: "Ransomware".into(),
            vuln: "Unpatched OS".into(),
            impact: Severity::High,
            likelihood: Severity::Medium,
            status: RiskStatus::MitigationInProgress,
        };
        let json = serde_json::to_string(&record).expect("serializes");
        assert!(json.contains("\"Mitigation in progress\""));
        let back: RiskRecord = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(record, back);
    }

    #[test]
    fn haystack_covers_every_field() {
        let record = RiskRecord {
            id: 42,
            asset: "Payroll App".into(),
            threat: "Credential Stuffing".into(),
            vuln: "Weak MFA".into(),
            impact: Severity::Medium,
            likelihood: Severity::High,
            status: RiskStatus::Open,
        };
        let hay = record.haystack();
        for needle in ["42", "payroll app", "credential", "weak mfa", "medium", "high", "open"] {
            assert!(hay.contains(needle), "haystack missing {needle:?}: {hay}");
        }
    }

    #[test]
    fn draft_without_status_skips_field_in_json() {
        let draft = RiskDraft::new("X", "Y", "Z", Severity::Low, Severity::Low);
        let json = serde_json::to_string(&draft).expect("serializes");
        assert!(!json.contains("status"));
    }
}
