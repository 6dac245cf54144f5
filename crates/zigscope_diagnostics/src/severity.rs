use std::fmt;

/// Severity of a single [`crate::Issue`].
///
/// Ranked `Error < Warning < Info` for sort purposes (see
/// [`crate::Issue::severity_rank`]); lower rank sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Stable sort rank used by [`crate::sort_issues`]. Not the enum's
    /// discriminant order on purpose: discriminant order is an
    /// implementation detail we don't want tests pinned to.
    pub const fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}
