use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use zigscope_diagnostics::{Issue, IssueKind, Severity};
use zigscope_scope::{ScopeKind, ScopeTree};
use zigscope_settings::TestingConfig;
use zigscope_source::SourceContext;

use crate::naming::{parse_name_shape, NameShape};

static PUB_FN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpub\s+fn\b").expect("static regex is valid"));

/// Runs the naming-shape, category-presence, and allowed-categories
/// checks over every `test` scope in `tree` (spec §4.5).
pub(crate) fn check_test_names(ctx: &SourceContext, tree: &ScopeTree, config: &TestingConfig, issues: &mut Vec<Issue>) {
    for scope in tree.scopes_of_kind(ScopeKind::Test) {
        let Some(name) = &scope.name else { continue };
        let (line, column) = ctx.offset_to_line_col(scope.start_offset as usize);

        match parse_name_shape(name) {
            NameShape::WellFormed { category } => {
                if config.check_category_presence && !config.allowed_categories.contains(&category) {
                    issues.push(Issue::new(
                        ctx.file_path(),
                        line,
                        column,
                        Severity::Warning,
                        IssueKind::TestOutsideAllowedCategories,
                        format!("test category `{category}` is not in the configured allowlist"),
                    ));
                }
            }
            NameShape::MissingCategory => {
                if config.check_category_presence {
                    issues.push(Issue::new(
                        ctx.file_path(),
                        line,
                        column,
                        Severity::Warning,
                        IssueKind::MissingTestCategory,
                        format!("test `{name}` has no `<category>:` prefix"),
                    ));
                }
            }
            NameShape::Malformed => {
                if config.check_naming {
                    issues.push(Issue::new(
                        ctx.file_path(),
                        line,
                        column,
                        Severity::Warning,
                        IssueKind::InvalidTestNaming,
                        format!(
                            "test name `{name}` does not match \
                             `<category>: <subject>: <description>`"
                        ),
                    ));
                }
            }
        }
    }
}

/// Emits `missing_test_category` (informational, spec §4.5) once per
/// file when the file declares at least one `pub fn` and no `test`
/// scope appears anywhere in it, scanning the **entire** file rather
/// than stopping at the first declaration (spec §4.5 "must scan the
/// entire file, including trailing test blocks").
pub(crate) fn check_missing_tests_in_file(
    ctx: &SourceContext,
    tree: &ScopeTree,
    config: &TestingConfig,
    issues: &mut Vec<Issue>,
) {
    if !config.check_missing_tests_in_file {
        return;
    }
    if tree.scopes_of_kind(ScopeKind::Test).next().is_some() {
        return;
    }
    let text = ctx.text(0..ctx.len());
    let has_public_fn = PUB_FN_RE
        .find_iter(text)
        .any(|m| ctx.is_in_code(m.start()));
    if !has_public_fn {
        return;
    }
    issues.push(Issue::new(
        ctx.file_path(),
        1,
        1,
        Severity::Info,
        IssueKind::MissingTestCategory,
        "file declares public functions but contains no test declarations",
    ));
}

/// Counts test scopes by their well-formed category, ignoring tests
/// whose name has no parseable category (spec §4.5 "Category
/// breakdown").
pub(crate) fn category_breakdown(tree: &ScopeTree) -> FxHashMap<String, u32> {
    tree.scopes_of_kind(ScopeKind::Test)
        .filter_map(|scope| scope.name.as_deref())
        .filter_map(|name| match parse_name_shape(name) {
            NameShape::WellFormed { category } => Some(category),
            _ => None,
        })
        .counts()
        .into_iter()
        .map(|(category, count)| (category, count as u32))
        .collect()
}
