use crate::Issue;

/// A file that could not be analyzed, with a human-readable reason
/// (spec §3 `Result.failed_files`, §7 propagation policy).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

impl FailedFile {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// The owned, ordered output of one analysis call. Named
/// `AnalysisResult` rather than `Result` to avoid colliding with
/// `std::result::Result` (spec §3 calls this type `Result`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisResult {
    pub issues: Vec<Issue>,
    pub files_analyzed: u32,
    pub analysis_time_ms: u64,
    pub failed_files: Vec<FailedFile>,
}

impl AnalysisResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merges `other` into `self`, preserving ordering invariants by
    /// re-sorting the combined issue list (spec §4.6 Aggregation).
    pub fn merge(&mut self, other: AnalysisResult) {
        self.issues.extend(other.issues);
        self.files_analyzed += other.files_analyzed;
        self.analysis_time_ms += other.analysis_time_ms;
        self.failed_files.extend(other.failed_files);
        sort_issues(&mut self.issues);
    }
}

/// Merges many per-file results into one, as the external parallel-file
/// collaborator is expected to do (spec §5 "Parallel file analysis").
pub fn merge_results(results: impl IntoIterator<Item = AnalysisResult>) -> AnalysisResult {
    let mut merged = AnalysisResult::empty();
    for result in results {
        merged.merge(result);
    }
    merged
}

/// Sorts `issues` by `(file_path, line, column, severity_rank, kind_rank)`
/// (spec §4.6, §8 invariant 3). Stable: issues with equal keys keep
/// their relative emission order.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}
