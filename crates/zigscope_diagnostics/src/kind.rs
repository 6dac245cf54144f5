use std::fmt;

/// Closed set of diagnostic kinds. Extensibility is deliberately
/// deferred (see spec §3): adding a new kind is a breaking change to
/// this enum, not a registration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IssueKind {
    MissingScopedRelease,
    AllocatorMismatch,
    DisallowedAllocator,
    ArenaInLibrary,
    OwnershipTransferHint,
    InvalidTestNaming,
    MissingTestCategory,
    TestOutsideAllowedCategories,
    ParseFailure,
    ConfigurationError,
    PatternValidationWarning,
}

impl IssueKind {
    /// Stable rank for `(file_path, line, column, kind)` ordering.
    /// Memory-analysis kinds sort before testing-analysis kinds, which
    /// sort before structural/configuration kinds; arbitrary but fixed.
    pub const fn rank(self) -> u8 {
        match self {
            IssueKind::MissingScopedRelease => 0,
            IssueKind::AllocatorMismatch => 1,
            IssueKind::DisallowedAllocator => 2,
            IssueKind::ArenaInLibrary => 3,
            IssueKind::OwnershipTransferHint => 4,
            IssueKind::InvalidTestNaming => 5,
            IssueKind::MissingTestCategory => 6,
            IssueKind::TestOutsideAllowedCategories => 7,
            IssueKind::ParseFailure => 8,
            IssueKind::ConfigurationError => 9,
            IssueKind::PatternValidationWarning => 10,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            IssueKind::MissingScopedRelease => "missing_scoped_release",
            IssueKind::AllocatorMismatch => "allocator_mismatch",
            IssueKind::DisallowedAllocator => "disallowed_allocator",
            IssueKind::ArenaInLibrary => "arena_in_library",
            IssueKind::OwnershipTransferHint => "ownership_transfer_hint",
            IssueKind::InvalidTestNaming => "invalid_test_naming",
            IssueKind::MissingTestCategory => "missing_test_category",
            IssueKind::TestOutsideAllowedCategories => "test_outside_allowed_categories",
            IssueKind::ParseFailure => "parse_failure",
            IssueKind::ConfigurationError => "configuration_error",
            IssueKind::PatternValidationWarning => "pattern_validation_warning",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
