//! Owned diagnostic model for zigscope.
//!
//! This crate has no knowledge of source text, scopes, or rules — it
//! only owns the shape of a finished diagnostic and the rules for
//! ordering and merging them. Every other crate in the workspace
//! depends on this one; it depends on nothing workspace-local.

mod collector;
mod issue;
mod kind;
mod result;
mod severity;

pub use collector::IssueCollector;
pub use issue::Issue;
pub use kind::IssueKind;
pub use result::{merge_results, sort_issues, AnalysisResult, FailedFile};
pub use severity::Severity;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sorts_by_file_then_line_then_column_then_severity_then_kind() {
        let mut issues = vec![
            Issue::new("b.zig", 1, 1, Severity::Warning, IssueKind::MissingScopedRelease, "x"),
            Issue::new("a.zig", 2, 1, Severity::Error, IssueKind::MissingScopedRelease, "x"),
            Issue::new("a.zig", 1, 5, Severity::Error, IssueKind::MissingScopedRelease, "x"),
            Issue::new("a.zig", 1, 1, Severity::Warning, IssueKind::MissingScopedRelease, "x"),
            Issue::new("a.zig", 1, 1, Severity::Error, IssueKind::AllocatorMismatch, "x"),
            Issue::new("a.zig", 1, 1, Severity::Error, IssueKind::MissingScopedRelease, "x"),
        ];
        sort_issues(&mut issues);
        let keys: Vec<_> = issues.iter().map(Issue::sort_key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(issues[0].file_path, "a.zig");
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[0].column, 1);
        assert_eq!(issues[0].kind, IssueKind::MissingScopedRelease);
    }

    #[test]
    fn merge_results_sums_counters_and_concatenates_failed_files() {
        let mut a = AnalysisResult {
            issues: vec![Issue::new("a.zig", 1, 1, Severity::Error, IssueKind::ParseFailure, "x")],
            files_analyzed: 1,
            analysis_time_ms: 10,
            failed_files: vec![],
        };
        let b = AnalysisResult {
            issues: vec![Issue::new("b.zig", 1, 1, Severity::Error, IssueKind::ParseFailure, "y")],
            files_analyzed: 1,
            analysis_time_ms: 5,
            failed_files: vec![FailedFile::new("c.zig", "not found")],
        };
        a.merge(b);
        assert_eq!(a.files_analyzed, 2);
        assert_eq!(a.analysis_time_ms, 15);
        assert_eq!(a.issues.len(), 2);
        assert_eq!(a.failed_files.len(), 1);
    }

    #[test]
    fn issue_collector_push_capped_stops_at_max() {
        let mut collector = IssueCollector::new();
        for i in 0..5 {
            collector.push_capped(
                Issue::new("a.zig", i, 1, Severity::Info, IssueKind::ParseFailure, "x"),
                Some(3),
            );
        }
        assert_eq!(collector.len(), 3);
    }

    #[test]
    fn empty_result_has_zero_issues() {
        let result = AnalysisResult::empty();
        assert!(result.issues.is_empty());
        assert_eq!(result.files_analyzed, 0);
    }

    /// Spec §8 round-trip law: JSON-formatting then JSON-parsing an
    /// issue with control characters and quotes in its message yields
    /// the same bytes back. `serde_json` itself is the collaborator's
    /// formatter (out of scope here); this only proves the `Serialize`
    /// derive this crate ships is round-trip-safe for whatever
    /// formatter a caller plugs in.
    #[test]
    fn json_round_trip_preserves_message_and_suggestion_bytes() {
        let issue = Issue::new(
            "weird\"path\".zig",
            4,
            2,
            Severity::Error,
            IssueKind::MissingScopedRelease,
            "line one\nline two\twith a tab and a \"quote\"",
        )
        .with_suggestion("wrap in `defer a.free(d);`\r\nnext line");

        let encoded = serde_json::to_string(&issue).expect("issue serializes");
        assert!(!encoded.contains('\n'));
        assert!(!encoded.contains('\r'));

        let decoded: Issue = serde_json::from_str(&encoded).expect("issue round-trips");
        assert_eq!(decoded, issue);
    }
}
