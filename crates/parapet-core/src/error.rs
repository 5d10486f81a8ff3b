use std::fmt;

use thiserror::Error;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidEnumValue,
    FetchFailed,
    MutationPending,
    ExportWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidEnumValue => "E2001",
            Self::FetchFailed => "E3001",
            Self::MutationPending => "E3002",
            Self::ExportWriteFailed => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidEnumValue => "Invalid severity/status value",
            Self::FetchFailed => "Risk fetch failed",
            Self::MutationPending => "A mutation is already in flight",
            Self::ExportWriteFailed => "CSV export write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in parapet.toml and retry."),
            Self::InvalidEnumValue => {
                Some("Use Low/Medium/High for severities; Open/Mitigation in progress/Closed for status.")
            }
            Self::FetchFailed => Some("Retry the fetch; the register itself is unaffected."),
            Self::MutationPending => Some("Wait for the in-flight add to settle, then retry."),
            Self::ExportWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Domain errors raised by parapet-core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A severity or status label did not parse.
    #[error("invalid {field} value: {value:?}")]
    InvalidEnumValue {
        /// Which field was being parsed ("severity" or "status").
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// `parapet.toml` was present but malformed.
    #[error("failed to parse parapet.toml: {0}")]
    ConfigParse(String),

    /// Writing the exported CSV failed.
    #[error("export write failed: {0}")]
    ExportWrite(#[from] std::io::Error),
}

impl CoreError {
    /// The stable machine code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidEnumValue { .. } => ErrorCode::InvalidEnumValue,
            Self::ConfigParse(_) => ErrorCode::ConfigParseError,
            Self::ExportWrite(_) => ErrorCode::ExportWriteFailed,
        }
    }

    /// Remediation hint for terminal output.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or("No suggestion available.")
            .to_string()
    }
}
