//! Scope Tracker: builds the hierarchical scope tree a single file's
//! source resolves to, with per-scope variable records and
//! allocator-derivation links (spec §4.3).
//!
//! This is the one part of the pipeline both rule engines
//! ([`zigscope_memory`](../zigscope_memory/index.html) and
//! [`zigscope_testing`](../zigscope_testing/index.html)) read from but
//! never mutate: the tree is built once, then handed to both as an
//! immutable `&ScopeTree` (spec §2 "independent consumers of the same
//! tree; they do not share mutable state").

mod builder;
mod ids;
mod scope;
mod tokenizer;
mod tree;
mod variable;

use zigscope_diagnostics::Issue;
use zigscope_patterns::CompiledPatternSet;
use zigscope_settings::{ValidatedConfig, DEFAULT_MAX_DEPTH};
use zigscope_source::SourceContext;

pub use ids::ScopeId;
pub use scope::{Scope, ScopeKind};
pub use tree::{ScopeTree, ScopeTreeStats};
pub use variable::{AllocatorOrigin, VariableKind, VariableRecord};

/// Builds a [`ScopeTree`] from a [`SourceContext`] plus the compiled
/// allocator-pattern set (spec §6 "Scope-tracker builder:
/// `with_source(...).with_file_name(...).with_config(...).build()`").
///
/// The builder only needs the allocator patterns (to classify
/// initializer expressions while it scans) and the max-depth limit out
/// of the rest of [`zigscope_settings::Config`]; [`Self::with_config`]
/// pulls both from a [`ValidatedConfig`] in one call, or
/// [`Self::with_allocator_patterns`]/[`Self::with_max_depth`] can be
/// used directly, as the facade crate's `build_tree` does.
pub struct ScopeTrackerBuilder<'a> {
    source: Option<&'a SourceContext>,
    file_name: Option<&'a str>,
    allocator_patterns: Option<&'a CompiledPatternSet>,
    max_depth: u32,
}

impl<'a> Default for ScopeTrackerBuilder<'a> {
    fn default() -> Self {
        Self {
            source: None,
            file_name: None,
            allocator_patterns: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl<'a> ScopeTrackerBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source(mut self, source: &'a SourceContext) -> Self {
        self.source = Some(source);
        self
    }

    /// Overrides the file name attached to issues this builder raises
    /// itself (spec §6 documented surface), in case a caller wants
    /// something other than the [`SourceContext`]'s own `file_path()`
    /// (e.g. a relative path while the context was built from an
    /// absolute one). Most callers never need this: `with_source`
    /// alone already gives every issue a correct path.
    #[must_use]
    pub fn with_file_name(mut self, file_name: &'a str) -> Self {
        self.file_name = Some(file_name);
        self
    }

    #[must_use]
    pub fn with_allocator_patterns(mut self, patterns: &'a CompiledPatternSet) -> Self {
        self.allocator_patterns = Some(patterns);
        self
    }

    /// Convenience over [`Self::with_allocator_patterns`] plus
    /// [`Self::with_max_depth`]: pulls both out of an already-validated
    /// config (spec §6 documented surface), the same extraction the
    /// facade crate's `build_tree` performs by hand.
    #[must_use]
    pub fn with_config(self, validated: &'a ValidatedConfig) -> Self {
        self.with_allocator_patterns(&validated.allocator_patterns)
            .with_max_depth(validated.config.max_depth)
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds the tree, plus any `parse_failure` issues raised while
    /// scanning (spec §4.3 "Depth limit... emit a `parse_failure`
    /// diagnostic").
    ///
    /// # Panics
    ///
    /// Panics if [`Self::with_source`] was never called: the builder
    /// has nothing to scan.
    pub fn build(self) -> (ScopeTree, Vec<Issue>) {
        let source = self.source.expect("ScopeTrackerBuilder::with_source was not called");
        let empty_patterns;
        let patterns = match self.allocator_patterns {
            Some(p) => p,
            None => {
                let (set, _) = zigscope_patterns::validate_and_compile(Vec::new());
                empty_patterns = set;
                &empty_patterns
            }
        };
        builder::Builder::new(source, patterns, self.max_depth.max(1), self.file_name).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;
    use zigscope_patterns::{default_allocator_patterns, validate_and_compile, PatternOrigin};

    fn build_tree(src: &str) -> (ScopeTree, Vec<Issue>) {
        let (ctx, _) = SourceContext::new(src.as_bytes().to_vec(), "t.zig");
        let entries = default_allocator_patterns()
            .into_iter()
            .map(|p| (p, PatternOrigin::BuiltInDefault))
            .collect();
        let (patterns, _) = validate_and_compile(entries);
        // Leak is fine in tests: patterns must outlive the builder call.
        let patterns: &'static _ = Box::leak(Box::new(patterns));
        let ctx: &'static _ = Box::leak(Box::new(ctx));
        ScopeTrackerBuilder::new()
            .with_source(ctx)
            .with_allocator_patterns(patterns)
            .build()
    }

    #[test]
    fn function_scope_captures_name_and_return_type() {
        let (tree, issues) = build_tree("fn make(a: Allocator) ![]u8 {\n    return undefined;\n}\n");
        assert!(issues.is_empty());
        let funcs: Vec<_> = tree.scopes_of_kind(ScopeKind::Function).collect();
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].name.as_deref(), Some("make"));
        assert_eq!(funcs[0].return_type_text.as_deref(), Some("![]u8"));
    }

    #[test]
    fn parameter_typed_allocator_is_classified() {
        let (tree, _) = build_tree("fn f(a: std.mem.Allocator) void {}\n");
        let var = tree.variables().iter().find(|v| v.name == "a").unwrap();
        assert_eq!(var.allocator_origin, Some(AllocatorOrigin::Parameter));
    }

    #[test]
    fn test_scope_captures_string_name() {
        let (tree, _) = build_tree(r#"test "unit: Foo: does a thing" { }"#);
        let tests: Vec<_> = tree.scopes_of_kind(ScopeKind::Test).collect();
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name.as_deref(), Some("unit: Foo: does a thing"));
    }

    #[test]
    fn named_struct_scope_captures_type_name() {
        let (tree, _) = build_tree("const Point = struct {\n    x: i32,\n    y: i32,\n};\n");
        let structs: Vec<_> = tree.scopes_of_kind(ScopeKind::Struct).collect();
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].name.as_deref(), Some("Point"));
    }

    #[test]
    fn scope_containment_invariant_holds() {
        let (tree, _) = build_tree(
            "fn f() void {\n    if (true) {\n        const x = 1;\n    }\n}\n",
        );
        for scope in tree.all_scopes() {
            if let Some(parent) = scope.parent {
                let parent = tree.scope(parent);
                assert!(parent.start_offset <= scope.start_offset);
                assert!(scope.end_offset <= parent.end_offset);
            }
        }
    }

    #[test]
    fn arena_allocator_instance_is_named() {
        let (tree, _) = build_tree(
            "fn g(parent: Allocator) void {\n    var arena = ArenaAllocator.init(parent);\n}\n",
        );
        let var = tree.variables().iter().find(|v| v.name == "arena").unwrap();
        assert_eq!(
            var.allocator_origin,
            Some(AllocatorOrigin::NamedInstance("arena_allocator".to_string()))
        );
    }

    #[test]
    fn allocator_derived_from_arena_is_linked() {
        let (tree, _) = build_tree(
            "fn g(parent: Allocator) void {\n    var arena = ArenaAllocator.init(parent);\n    const a = arena.allocator();\n}\n",
        );
        let func = tree.scopes_of_kind(ScopeKind::Function).next().unwrap();
        let a = tree.variables().iter().find(|v| v.name == "a").unwrap();
        match &a.allocator_origin {
            Some(AllocatorOrigin::DerivedFromArena(scope, base)) => {
                assert_eq!(*scope, func.id);
                assert_eq!(base, "arena");
            }
            other => panic!("expected DerivedFromArena, got {other:?}"),
        }
    }

    #[test_case(ScopeKind::If, 1; "one_if")]
    #[test_case(ScopeKind::Else, 1; "one_else")]
    #[test_case(ScopeKind::While, 1; "one_while")]
    #[test_case(ScopeKind::For, 0; "no_for")]
    fn if_else_and_while_scopes_are_tracked(kind: ScopeKind, expected: usize) {
        let (tree, _) = build_tree(
            "fn f() void {\n    if (true) {\n    } else {\n    }\n    while (true) {\n    }\n}\n",
        );
        assert_eq!(tree.scopes_of_kind(kind).count(), expected);
    }

    #[test]
    fn struct_literal_braces_do_not_open_a_scope() {
        let (tree, _) = build_tree(
            "fn get(a: Allocator) R {\n    const d = a.alloc(u8, 16);\n    return R{ .buf = d };\n}\n",
        );
        // Only the function's own scope plus the file root; the
        // struct-literal `{ .buf = d }` must not have become a Block.
        assert_eq!(tree.scopes_of_kind(ScopeKind::Block).count(), 0);
    }

    #[test]
    fn depth_limit_stops_opening_new_scopes_and_reports_once() {
        let mut src = String::from("fn f() void {\n");
        for _ in 0..5 {
            src.push_str("if (true) {\n");
        }
        for _ in 0..5 {
            src.push_str("}\n");
        }
        src.push_str("}\n");
        let (ctx, _) = SourceContext::new(src.into_bytes(), "t.zig");
        let (patterns, _) = validate_and_compile(Vec::new());
        let (_tree, issues) = ScopeTrackerBuilder::new()
            .with_source(&ctx)
            .with_allocator_patterns(&patterns)
            .with_max_depth(3)
            .build();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, zigscope_diagnostics::IssueKind::ParseFailure);
    }

    #[test]
    fn switch_case_opens_its_own_scope_not_the_switch_body() {
        let (tree, _) = build_tree(
            "fn f(x: i32) void {\n    switch (x) {\n        0 => {\n            const y = 1;\n        },\n        else => {},\n    }\n}\n",
        );
        assert_eq!(tree.scopes_of_kind(ScopeKind::SwitchCase).count(), 2);
    }

    #[test]
    fn braceless_if_body_does_not_mistag_the_next_struct_literal_as_its_scope() {
        let (tree, _) = build_tree(
            "fn f(a: Allocator) R {\n    if (true) return undefined;\n    return R{ .buf = a };\n}\n",
        );
        // The braceless `if` never gets a body brace of its own; the
        // struct literal on the following line must not be consumed as
        // that `if`'s scope.
        assert_eq!(tree.scopes_of_kind(ScopeKind::If).count(), 0);
        assert_eq!(tree.scopes_of_kind(ScopeKind::Block).count(), 0);
    }

    #[test]
    fn with_config_extracts_allocator_patterns_and_max_depth_from_a_validated_config() {
        let mut config = zigscope_settings::Config::default();
        config.max_depth = 2;
        let validated = zigscope_settings::validate(config).expect("valid config");
        let (ctx, _) = SourceContext::new(
            b"fn f() void {\n    if (true) {\n        if (true) {\n        }\n    }\n}\n".to_vec(),
            "t.zig",
        );
        let (_tree, issues) = ScopeTrackerBuilder::new()
            .with_source(&ctx)
            .with_config(&validated)
            .build();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, zigscope_diagnostics::IssueKind::ParseFailure);
    }

    #[test]
    fn with_file_name_overrides_the_path_on_issues_the_builder_raises_itself() {
        let (ctx, _) = SourceContext::new(b"fn f() void {\n    if (true) {\n    }\n}\n".to_vec(), "t.zig");
        let (patterns, _) = validate_and_compile(Vec::new());
        let (_tree, issues) = ScopeTrackerBuilder::new()
            .with_source(&ctx)
            .with_allocator_patterns(&patterns)
            .with_max_depth(1)
            .with_file_name("override.zig")
            .build();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file_path, "override.zig");
    }
}
