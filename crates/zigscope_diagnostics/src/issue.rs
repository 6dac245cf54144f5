use crate::{IssueKind, Severity};

/// A single diagnostic.
///
/// Every string field is a `String`, never `&'static str` or a
/// borrowed/owned tagged union: the type system is the enforcement
/// mechanism for "every string field is owned by the issue" (spec
/// §3, §9) — there is no code path that can construct an `Issue`
/// holding a borrowed string, so there is nothing to double-free or
/// leak and no `free_issue` call is needed (Rust's `Drop` frees every
/// `String` exactly once when the `Issue` goes out of scope).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
    pub file_path: String,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(
        file_path: impl Into<String>,
        line: u32,
        column: u32,
        severity: Severity,
        kind: IssueKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
            severity,
            kind,
            message: message.into(),
            suggestion: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Sort key for `(file_path, line, column, severity_rank, kind_rank)`
    /// ordering (spec §4.6, §8 invariant 3).
    pub fn sort_key(&self) -> (&str, u32, u32, u8, u8) {
        (
            self.file_path.as_str(),
            self.line,
            self.column,
            self.severity.rank(),
            self.kind.rank(),
        )
    }
}
