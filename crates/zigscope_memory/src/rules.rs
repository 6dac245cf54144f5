use zigscope_diagnostics::{Issue, IssueKind, Severity};
use zigscope_patterns::OwnershipMatcher;
use zigscope_scope::{AllocatorOrigin, ScopeTree};
use zigscope_settings::MemoryConfig;
use zigscope_source::SourceContext;

use crate::allocation_site::AllocationSite;
use crate::ownership::{function_pattern_matches, site_is_return_expression};
use crate::release::has_bare_success_path_release;

/// Applies every memory rule to one [`AllocationSite`], per spec §4.4
/// "Suppression & priority": ownership-transfer resolution runs first
/// and, when it fires, suppresses `missing_scoped_release` — at most
/// one of the two ever fires for a given site.
pub(crate) fn evaluate_site(
    ctx: &SourceContext,
    tree: &ScopeTree,
    config: &MemoryConfig,
    ownership_matcher: &OwnershipMatcher,
    site: &AllocationSite,
    issues: &mut Vec<Issue>,
) {
    let transferred = site.returned_later
        || site_is_return_expression(ctx, site.offset)
        || function_pattern_matches(tree, site.scope, ownership_matcher);

    if transferred {
        if config.emit_ownership_hints {
            issues.push(Issue::new(
                ctx.file_path(),
                site.line,
                site.column,
                Severity::Info,
                IssueKind::OwnershipTransferHint,
                "allocation's ownership is transferred out of this scope",
            ));
        }
    } else if config.check_scoped_release {
        // No target variable means the rule cannot be evaluated for
        // this site and is silently skipped (spec §4.4 Failure
        // semantics).
        if let Some(target) = &site.target_variable {
            let released = site.has_scoped_release
                || (site.has_errdefer_release
                    && has_bare_success_path_release(ctx, tree, site.scope, target));
            if !released {
                issues.push(Issue::new(
                    ctx.file_path(),
                    site.line,
                    site.column,
                    Severity::Warning,
                    IssueKind::MissingScopedRelease,
                    format!("`{target}` is allocated here without a matching scoped release"),
                ));
            }
        }
    }

    if config.check_allocator_allowlist {
        if let Some(name) = &site.classified_allocator {
            if !config.allowed_allocators.contains(name) {
                issues.push(Issue::new(
                    ctx.file_path(),
                    site.line,
                    site.column,
                    Severity::Warning,
                    IssueKind::DisallowedAllocator,
                    format!("allocator `{name}` is not in the configured allowlist"),
                ));
            }
        }
    }
}

/// Arena-in-library rule (spec §4.4): flags every arena-allocator
/// variable declaration when the file is tagged as a library.
pub(crate) fn check_arena_in_library(
    ctx: &SourceContext,
    tree: &ScopeTree,
    config: &MemoryConfig,
    issues: &mut Vec<Issue>,
) {
    if !config.check_arena_usage || !config.treat_as_library {
        return;
    }
    for variable in tree.variables() {
        if matches!(&variable.allocator_origin, Some(AllocatorOrigin::NamedInstance(name)) if name == "arena_allocator")
        {
            issues.push(Issue::new(
                ctx.file_path(),
                variable.decl_line,
                variable.decl_column,
                Severity::Warning,
                IssueKind::ArenaInLibrary,
                format!("arena allocator `{}` declared in a library file", variable.name),
            ));
        }
    }
}
