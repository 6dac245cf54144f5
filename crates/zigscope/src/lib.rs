//! Facade crate: wires [`zigscope_source`], [`zigscope_scope`],
//! [`zigscope_memory`], and [`zigscope_testing`] into the entry points
//! collaborators call (spec §6).
//!
//! Stateless between calls: every `analyze_*` function constructs its
//! own [`zigscope_source::SourceContext`] and [`zigscope_scope::ScopeTree`]
//! from scratch and drops them on return (spec §3 Lifecycles).

mod error;

use std::path::Path;
use std::time::Instant;

use rustc_hash::FxHashMap;

use zigscope_diagnostics::{sort_issues, AnalysisResult, FailedFile};
use zigscope_settings::{validate, Config, ValidatedConfig};
use zigscope_source::SourceContext;

pub use error::AnalysisIoError;
pub use zigscope_scope::ScopeTrackerBuilder;

/// Which analyzers an internal `run` pass should execute.
#[derive(Clone, Copy)]
enum AnalysisScope {
    Both,
    MemoryOnly,
    TestingOnly,
}

/// Pure: reads no filesystem, consults no environment (spec §8
/// invariant 7 "No-I/O purity").
pub fn analyze_source(bytes: &[u8], path_label: &str, config: &Config) -> AnalysisResult {
    run(bytes, path_label, config, AnalysisScope::Both)
}

/// Performs one filesystem read, then delegates to
/// [`analyze_source`] (spec §6 "performs one filesystem read").
pub fn analyze_file(path: &Path, config: &Config) -> Result<AnalysisResult, AnalysisIoError> {
    let bytes = std::fs::read(path).map_err(|e| AnalysisIoError::from_io(path, e))?;
    let path_label = path.to_string_lossy();
    Ok(analyze_source(&bytes, &path_label, config))
}

/// Same shape as [`analyze_source`], narrowed to memory-analyzer
/// issues only (spec §6).
pub fn analyze_memory(bytes: &[u8], path_label: &str, config: &Config) -> AnalysisResult {
    run(bytes, path_label, config, AnalysisScope::MemoryOnly)
}

/// Same shape as [`analyze_source`], narrowed to testing-analyzer
/// issues only (spec §6).
pub fn analyze_tests(bytes: &[u8], path_label: &str, config: &Config) -> AnalysisResult {
    run(bytes, path_label, config, AnalysisScope::TestingOnly)
}

/// Maps category name to test count, recomputing the scope tree from
/// `bytes` (spec §4.5 "Category breakdown"; see `DESIGN.md` for why
/// this takes source rather than an `AnalysisResult`).
pub fn get_category_breakdown(bytes: &[u8], path_label: &str, config: &Config) -> FxHashMap<String, u32> {
    let Ok(validated) = validate(config.clone()) else {
        return FxHashMap::default();
    };
    let (ctx, _) = SourceContext::new(bytes.to_vec(), path_label);
    let (tree, _) = build_tree(&ctx, &validated);
    zigscope_testing::category_breakdown(&tree)
}

fn run(bytes: &[u8], path_label: &str, config: &Config, scope: AnalysisScope) -> AnalysisResult {
    let start = Instant::now();
    let validated = match validate(config.clone()) {
        Ok(v) => v,
        Err(err) => {
            log::warn!(target: "zigscope", "configuration rejected for {path_label}: {err}");
            return AnalysisResult {
                issues: Vec::new(),
                files_analyzed: 0,
                analysis_time_ms: elapsed_ms(start),
                failed_files: vec![FailedFile::new(path_label, err.to_string())],
            };
        }
    };

    let (ctx, mut issues) = SourceContext::new(bytes.to_vec(), path_label);
    let (tree, scope_issues) = build_tree(&ctx, &validated);
    issues.extend(scope_issues);

    for finding in &validated.pattern_warnings {
        if finding.severity != zigscope_diagnostics::Severity::Error {
            issues.push(zigscope_diagnostics::Issue::new(
                ctx.file_path(),
                1,
                1,
                zigscope_diagnostics::Severity::Warning,
                zigscope_diagnostics::IssueKind::PatternValidationWarning,
                finding.message.clone(),
            ));
        }
    }

    match scope {
        AnalysisScope::Both => {
            issues.extend(zigscope_memory::analyze(&ctx, &tree, &validated));
            issues.extend(zigscope_testing::analyze(&ctx, &tree, &validated));
        }
        AnalysisScope::MemoryOnly => issues.extend(zigscope_memory::analyze(&ctx, &tree, &validated)),
        AnalysisScope::TestingOnly => issues.extend(zigscope_testing::analyze(&ctx, &tree, &validated)),
    }

    sort_issues(&mut issues);
    if let Some(max) = validated.config.options.max_issues {
        issues.truncate(max);
    }

    AnalysisResult {
        issues,
        files_analyzed: 1,
        analysis_time_ms: elapsed_ms(start),
        failed_files: Vec::new(),
    }
}

fn build_tree(ctx: &SourceContext, validated: &ValidatedConfig) -> (zigscope_scope::ScopeTree, Vec<zigscope_diagnostics::Issue>) {
    ScopeTrackerBuilder::new()
        .with_source(ctx)
        .with_allocator_patterns(&validated.allocator_patterns)
        .with_max_depth(validated.config.max_depth)
        .build()
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;
    use zigscope_diagnostics::IssueKind;

    #[test]
    fn empty_source_has_zero_issues_and_one_file() {
        let result = analyze_source(b"", "t.zig", &Config::default());
        assert!(result.issues.is_empty());
        assert_eq!(result.files_analyzed, 1);
    }

    #[test]
    fn comments_only_source_has_zero_issues() {
        let result = analyze_source(b"// just a comment\n", "t.zig", &Config::default());
        assert!(result.issues.is_empty());
    }

    #[test]
    fn missing_scoped_release_end_to_end() {
        let src = b"fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n}\n";
        let result = analyze_source(src, "t.zig", &Config::default());
        assert!(result.issues.iter().any(|i| i.kind == IssueKind::MissingScopedRelease));
    }

    #[test]
    fn invalid_max_depth_is_recorded_as_a_failed_file_not_a_panic() {
        let mut config = Config::default();
        config.max_depth = 0;
        let result = analyze_source(b"fn f() void {}\n", "t.zig", &config);
        assert!(result.issues.is_empty());
        assert_eq!(result.failed_files.len(), 1);
        assert_eq!(result.failed_files[0].path, "t.zig");
    }

    #[test]
    fn analyze_file_not_found_is_a_structured_error() {
        let err = analyze_file(Path::new("/nonexistent/path/zz.zig"), &Config::default()).unwrap_err();
        assert!(matches!(err, AnalysisIoError::NotFound(_)));
    }

    #[test]
    fn analyze_file_reads_and_analyzes_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.zig");
        std::fs::write(&path, b"fn f() void {}\n").unwrap();
        let result = analyze_file(&path, &Config::default()).unwrap();
        assert_eq!(result.files_analyzed, 1);
    }

    #[test]
    fn analyze_memory_excludes_testing_issues() {
        let src = r#"test "bogus category" { }"#;
        let result = analyze_memory(src.as_bytes(), "t.zig", &Config::default());
        assert!(result.issues.iter().all(|i| i.kind != IssueKind::MissingTestCategory));
    }

    #[test]
    fn analyze_tests_excludes_memory_issues() {
        let src = b"fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n}\n";
        let result = analyze_tests(src, "t.zig", &Config::default());
        assert!(result.issues.iter().all(|i| i.kind != IssueKind::MissingScopedRelease));
    }

    #[test]
    fn get_category_breakdown_matches_source_test_categories() {
        let src = br#"test "unit: A: one" { }
test "unit: B: two" { }
"#;
        let breakdown = get_category_breakdown(src, "t.zig", &Config::default());
        assert_eq!(breakdown.get("unit"), Some(&2));
    }

    #[test]
    fn idempotent_on_identical_input() {
        let src = b"fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n}\n";
        let config = Config::default();
        let first = analyze_source(src, "t.zig", &config);
        let second = analyze_source(src, "t.zig", &config);
        assert_eq!(first.issues, second.issues);
        assert_eq!(first.failed_files, second.failed_files);
    }

    #[test_case(b"fn f() void {}\n", "t.zig"; "well_formed_function")]
    #[test_case(b"", "t.zig"; "empty_source")]
    #[test_case(b"// a comment\n", "t.zig"; "comment_only_source")]
    fn analyze_source_never_reports_a_failed_file_for_well_formed_input(src: &[u8], label: &str) {
        let result = analyze_source(src, label, &Config::default());
        assert!(result.failed_files.is_empty());
    }

    #[test]
    fn max_issues_caps_result_length() {
        let src = br#"fn f() !void {
    const a = std.heap.page_allocator;
    const d1 = try a.alloc(u8, 1);
    const d2 = try a.alloc(u8, 1);
    const d3 = try a.alloc(u8, 1);
}
"#;
        let mut config = Config::default();
        config.options.max_issues = Some(1);
        let result = analyze_source(src, "t.zig", &config);
        assert_eq!(result.issues.len(), 1);
    }
}
