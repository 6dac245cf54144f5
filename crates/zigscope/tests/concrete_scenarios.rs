//! Whole-pipeline runs of the six concrete scenarios plus the
//! boundary behaviors, exercised through the public facade only.

use rustc_hash::FxHashSet;

use zigscope_diagnostics::{IssueKind, Severity};
use zigscope_settings::Config;

fn allocator_allowlist(config: &mut Config, names: &[&str]) {
    config.memory.check_allocator_allowlist = true;
    config.memory.allowed_allocators = names.iter().map(|s| s.to_string()).collect::<FxHashSet<_>>();
}

#[test]
fn scenario_1_missing_scoped_release() {
    let src = "fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n}\n";
    let result = zigscope::analyze_source(src.as_bytes(), "t.zig", &Config::default());
    let matches: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::MissingScopedRelease)
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].line, 3);
    assert!(matches!(matches[0].severity, Severity::Warning | Severity::Error));
}

#[test]
fn scenario_2_transferred_ownership_by_return() {
    let src = "fn make(a: Alloc) ![]u8 {\n    const d = try a.alloc(u8, 100);\n    return d;\n}\n";
    let result = zigscope::analyze_source(src.as_bytes(), "t.zig", &Config::default());
    assert!(result.issues.iter().all(|i| i.kind != IssueKind::MissingScopedRelease));
    assert!(result.issues.iter().all(|i| i.kind != IssueKind::OwnershipTransferHint));
}

#[test]
fn scenario_3_transferred_via_aggregate_field() {
    let src = "fn get(a: Alloc) !R {\n    const d = try a.alloc(u8, 16);\n    return R{ .buf = d };\n}\n";
    let result = zigscope::analyze_source(src.as_bytes(), "t.zig", &Config::default());
    assert!(result.issues.iter().all(|i| i.kind != IssueKind::MissingScopedRelease));
}

#[test]
fn scenario_4_disallowed_allocator() {
    let src = "fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n    defer a.free(d);\n}\n";
    let mut config = Config::default();
    allocator_allowlist(&mut config, &["gpa"]);
    let result = zigscope::analyze_source(src.as_bytes(), "t.zig", &config);
    let matches: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::DisallowedAllocator)
        .collect();
    assert_eq!(matches.len(), 1);
}

#[test]
fn scenario_5_test_naming() {
    let src = r#"
test "UnitFoo" { }
test "unit: Parser: empty input" { }
"#;
    let mut config = Config::default();
    config.testing.allowed_categories = ["unit", "integration"].into_iter().map(str::to_string).collect();
    let result = zigscope::analyze_source(src.as_bytes(), "t.zig", &config);

    let on_first_test = result
        .issues
        .iter()
        .filter(|i| i.line == 2 && matches!(i.kind, IssueKind::InvalidTestNaming | IssueKind::MissingTestCategory))
        .count();
    assert_eq!(on_first_test, 1);

    let on_second_test = result.issues.iter().filter(|i| i.line == 3).count();
    assert_eq!(on_second_test, 0);
}

#[test]
fn scenario_6_arena_derivation_suppresses_missing_release() {
    let src = "fn g(parent: Alloc) !void {\n    var arena = ArenaAlloc.init(parent);\n    defer arena.deinit();\n    const a = arena.allocator();\n    const d = try a.alloc(u8, 100);\n}\n";
    let result = zigscope::analyze_source(src.as_bytes(), "t.zig", &Config::default());
    assert!(result.issues.iter().all(|i| i.kind != IssueKind::MissingScopedRelease));
}

#[test]
fn boundary_empty_source() {
    let result = zigscope::analyze_source(b"", "t.zig", &Config::default());
    assert!(result.issues.is_empty());
    assert_eq!(result.files_analyzed, 1);
}

#[test]
fn boundary_comments_only_source() {
    let src = b"// nothing but talk\n/* and more talk */\n";
    let result = zigscope::analyze_source(src, "t.zig", &Config::default());
    assert!(result.issues.is_empty());
}

#[test]
fn boundary_max_nesting_depth_never_panics() {
    let mut src = String::from("fn f() void {\n");
    for _ in 0..200 {
        src.push_str("if (true) {\n");
    }
    for _ in 0..200 {
        src.push_str("}\n");
    }
    src.push_str("}\n");
    let result = zigscope::analyze_source(src.as_bytes(), "t.zig", &Config::default());
    assert!(result.issues.iter().any(|i| i.kind == IssueKind::ParseFailure));
}

#[test]
fn boundary_unterminated_string_at_eof() {
    let src = b"const a = 1;\nconst b = \"never closed";
    let result = zigscope::analyze_source(src, "t.zig", &Config::default());
    assert_eq!(
        result.issues.iter().filter(|i| i.kind == IssueKind::ParseFailure).count(),
        1
    );
}

#[test]
fn invariant_scope_containment_and_ordering_hold_on_a_mixed_file() {
    let src = "fn f() !void {\n    const a = std.heap.page_allocator;\n    const d1 = try a.alloc(u8, 1);\n    const d2 = try a.alloc(u8, 1);\n}\ntest \"bogus\" { }\n";
    let result = zigscope::analyze_source(src.as_bytes(), "t.zig", &Config::default());
    let mut prior: Option<(&str, u32, u32, u8, u8)> = None;
    for issue in &result.issues {
        let key = issue.sort_key();
        if let Some(p) = prior {
            assert!(p <= key);
        }
        prior = Some(key);
    }
}

#[test]
fn invariant_idempotence_across_repeated_calls() {
    let src = b"fn f() !void {\n    const a = std.heap.page_allocator;\n    const d = try a.alloc(u8, 100);\n}\n";
    let config = Config::default();
    let a = zigscope::analyze_source(src, "t.zig", &config);
    let b = zigscope::analyze_source(src, "t.zig", &config);
    assert_eq!(a.issues, b.issues);
}
