use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ExportNotFound,
    ItemNotFound,
    CycleDetected,
    ExportParseError,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::ExportNotFound => "E1004",
            Self::ItemNotFound => "E2001",
            Self::CycleDetected => "E2003",
            Self::ExportParseError => "E3004",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ExportNotFound => "Issue export not found",
            Self::ItemNotFound => "Issue not found",
            Self::CycleDetected => "Parent-child cycle detected",
            Self::ExportParseError => "Issue export parse error",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .thicket/config.toml and retry."),
            Self::ExportNotFound => {
                Some("Pass --file or set [export] path in .thicket/config.toml.")
            }
            Self::ItemNotFound => None,
            Self::CycleDetected => {
                Some("Remove one parent-child link on the reported path; no tree can be shown until then.")
            }
            Self::ExportParseError => {
                Some("Regenerate the export; expected a JSON array or one issue per line.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::ExportNotFound,
            ErrorCode::ItemNotFound,
            ErrorCode::CycleDetected,
            ErrorCode::ExportParseError,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::CycleDetected.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
