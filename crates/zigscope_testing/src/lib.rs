//! Testing Analyzer: test-naming and test-coverage conventions over a
//! [`zigscope_scope::ScopeTree`] (spec §4.5).
//!
//! Reads the tree built by `zigscope_scope`; shares it read-only with
//! `zigscope_memory` (spec §2 "independent consumers of the same
//! tree").

mod naming;
mod rules;

use rustc_hash::FxHashMap;

use zigscope_diagnostics::{sort_issues, Issue};
use zigscope_scope::ScopeTree;
use zigscope_settings::ValidatedConfig;
use zigscope_source::SourceContext;

pub use naming::{parse_name_shape, NameShape};

/// Runs every enabled testing rule over `tree`, returning issues
/// sorted per spec §4.6 ordering.
pub fn analyze(ctx: &SourceContext, tree: &ScopeTree, validated: &ValidatedConfig) -> Vec<Issue> {
    let config = &validated.config.testing;
    let mut issues = Vec::new();

    rules::check_test_names(ctx, tree, config, &mut issues);
    rules::check_missing_tests_in_file(ctx, tree, config, &mut issues);

    sort_issues(&mut issues);
    issues
}

/// Maps category name to test count across `tree` (spec §4.5
/// "Category breakdown").
pub fn category_breakdown(tree: &ScopeTree) -> FxHashMap<String, u32> {
    rules::category_breakdown(tree)
}
