//! Memory Analyzer: a rule engine over a [`zigscope_scope::ScopeTree`]
//! that finds allocation sites, classifies ownership transfer, and
//! emits `missing_scoped_release` / `disallowed_allocator` /
//! `arena_in_library` diagnostics (spec §4.4).
//!
//! Reads the tree built by `zigscope_scope`; never mutates it, and
//! shares it read-only with `zigscope_testing` (spec §2 "The two
//! analyzers are independent consumers of the same tree").

mod allocation_site;
mod ownership;
mod release;
mod rules;
mod util;

use zigscope_diagnostics::{sort_issues, Issue};
use zigscope_scope::ScopeTree;
use zigscope_settings::ValidatedConfig;
use zigscope_source::SourceContext;

pub use allocation_site::AllocationSite;

/// Runs every enabled memory rule over `tree`, returning issues sorted
/// per spec §4.6 ordering.
pub fn analyze(ctx: &SourceContext, tree: &ScopeTree, validated: &ValidatedConfig) -> Vec<Issue> {
    let config = &validated.config.memory;
    let sites = allocation_site::detect_allocation_sites(ctx, tree);

    let mut issues = Vec::new();
    for site in &sites {
        rules::evaluate_site(ctx, tree, config, &validated.ownership_patterns, site, &mut issues);
    }
    rules::check_arena_in_library(ctx, tree, config, &mut issues);

    sort_issues(&mut issues);
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;
    use zigscope_scope::ScopeTrackerBuilder;
    use zigscope_settings::{validate, Config};

    fn run(src: &str, configure: impl FnOnce(&mut Config)) -> Vec<Issue> {
        let mut config = Config::default();
        configure(&mut config);
        let validated = validate(config).expect("valid config");
        let (ctx, _) = SourceContext::new(src.as_bytes().to_vec(), "t.zig");
        let (tree, _) = ScopeTrackerBuilder::new()
            .with_source(&ctx)
            .with_allocator_patterns(&validated.allocator_patterns)
            .with_max_depth(validated.config.max_depth)
            .build();
        analyze(&ctx, &tree, &validated)
    }

    #[test]
    fn missing_scoped_release_is_reported() {
        let issues = run(
            "fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n}\n",
            |_| {},
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, zigscope_diagnostics::IssueKind::MissingScopedRelease);
        assert_eq!(issues[0].line, 3);
    }

    #[test]
    fn transferred_ownership_by_return_suppresses_missing_release() {
        let issues = run(
            "fn make(a: Alloc) ![]u8 {\n    const d = try a.alloc(u8, 100);\n    return d;\n}\n",
            |_| {},
        );
        assert!(issues
            .iter()
            .all(|i| i.kind != zigscope_diagnostics::IssueKind::OwnershipTransferHint));
    }

    #[test_case(
        "fn get(a: Alloc) !R {\n    const d = try a.alloc(u8, 16);\n    return R{ .buf = d };\n}\n";
        "direct_field_store"
    )]
    #[test_case(
        "fn get(a: Alloc) !R {\n    const d = try a.alloc(u8, 16);\n    var result: R = undefined;\n    result.buf = d;\n    return result;\n}\n";
        "assignment_after_declaration"
    )]
    #[test_case(
        "fn make(a: Alloc) ![]u8 {\n    const d = try a.alloc(u8, 100);\n    return d;\n}\n";
        "direct_return"
    )]
    fn transferred_allocations_never_report_missing_release(src: &str) {
        let issues = run(src, |_| {});
        assert!(issues
            .iter()
            .all(|i| i.kind != zigscope_diagnostics::IssueKind::MissingScopedRelease));
    }

    #[test]
    fn disallowed_allocator_is_reported() {
        let issues = run(
            "fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n    defer a.free(d);\n}\n",
            |config| {
                config.memory.check_allocator_allowlist = true;
                config.memory.allowed_allocators = ["gpa".to_string()].into_iter().collect();
            },
        );
        assert_eq!(
            issues.iter().filter(|i| i.kind == zigscope_diagnostics::IssueKind::DisallowedAllocator).count(),
            1
        );
    }

    #[test]
    fn arena_derivation_suppresses_missing_release() {
        let issues = run(
            "fn g(parent: Alloc) !void {\n    var arena = ArenaAllocator.init(parent);\n    defer arena.deinit();\n    const a = arena.allocator();\n    const d = try a.alloc(u8, 100);\n}\n",
            |_| {},
        );
        assert!(issues
            .iter()
            .all(|i| i.kind != zigscope_diagnostics::IssueKind::MissingScopedRelease));
    }

    #[test]
    fn errdefer_plus_bare_free_counts_as_released() {
        let issues = run(
            "fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n    errdefer a.free(d);\n    a.free(d);\n}\n",
            |_| {},
        );
        assert!(issues
            .iter()
            .all(|i| i.kind != zigscope_diagnostics::IssueKind::MissingScopedRelease));
    }

    #[test]
    fn arena_in_library_is_reported_when_configured() {
        let issues = run(
            "fn g(parent: Alloc) !void {\n    var arena = ArenaAllocator.init(parent);\n    defer arena.deinit();\n}\n",
            |config| {
                config.memory.check_arena_usage = true;
                config.memory.treat_as_library = true;
            },
        );
        assert_eq!(
            issues.iter().filter(|i| i.kind == zigscope_diagnostics::IssueKind::ArenaInLibrary).count(),
            1
        );
    }
}
