use once_cell::sync::Lazy;
use regex::Regex;

use zigscope_scope::{AllocatorOrigin, ScopeId, ScopeTree};
use zigscope_source::SourceContext;

use crate::ownership::returned_on_any_path;
use crate::release::scoped_release_flags;

/// An allocation site: a call to an allocation verb on an
/// allocator-bearing identifier (spec §3 Allocation Site).
#[derive(Debug, Clone)]
pub struct AllocationSite {
    pub scope: ScopeId,
    pub line: u32,
    pub column: u32,
    /// Byte offset of the call's identifier. Not part of spec §3's
    /// field list; kept so rule evaluation can re-locate the call in
    /// source text without re-scanning.
    pub offset: u32,
    pub target_variable: Option<String>,
    pub allocator_expr_text: String,
    pub classified_allocator: Option<String>,
    pub returned_later: bool,
    pub has_scoped_release: bool,
    pub has_errdefer_release: bool,
}

/// Allocation verbs recognized at a call site (spec §4.4 "`alloc`,
/// `create`, `dupe`, `alloc_sentinel`, `realloc`, and the equivalents
/// in the source language's std library").
static ALLOC_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<ident>[A-Za-z_]\w*)\.(?P<verb>alloc_sentinel|allocSentinel|dupeZ|alloc|create|dupe|realloc)\s*\(")
        .expect("static regex is valid")
});

static DECL_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:const|var)\s+(?P<name>[A-Za-z_]\w*)\s*(?::[^=]*)?=\s*(?:try\s+)?$")
        .expect("static regex is valid")
});

/// Scans `ctx` for every allocation site, resolving each call's base
/// identifier against the scope tree's `allocator_origin_of` (spec
/// §4.3) so that a plain method named `alloc` on an unrelated type
/// never becomes a false positive.
pub(crate) fn detect_allocation_sites(ctx: &SourceContext, tree: &ScopeTree) -> Vec<AllocationSite> {
    let text = ctx.text(0..ctx.len());
    let mut sites = Vec::new();

    for caps in ALLOC_CALL_RE.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always matches");
        let ident = &caps["ident"];
        let offset = whole.start();
        if !ctx.is_in_code(offset) {
            continue;
        }
        let Some(origin) = tree.allocator_origin_of(ident, offset as u32) else {
            continue;
        };

        let classified_allocator = classified_allocator_name(tree, origin);
        let scope = tree.enclosing_scope_at(offset as u32);
        let (line, column) = ctx.offset_to_line_col(offset);
        let target_variable = target_variable_of(text, offset);
        let allocator_expr_text = call_expr_text(text, whole.end(), whole.as_str());

        let (mut has_scoped_release, has_errdefer_release) = target_variable
            .as_deref()
            .map(|name| scoped_release_flags(ctx, tree, scope, name))
            .unwrap_or((false, false));

        // Arena-derived allocations are exempt once the arena itself is
        // released in an ancestor scope (spec §8 scenario 6).
        if let AllocatorOrigin::DerivedFromArena(arena_scope, arena_name) = origin {
            let (arena_defer, _) = scoped_release_flags(ctx, tree, *arena_scope, arena_name);
            if arena_defer {
                has_scoped_release = true;
            }
        }

        let returned_later = target_variable
            .as_deref()
            .is_some_and(|name| returned_on_any_path(ctx, tree, scope, name));

        sites.push(AllocationSite {
            scope,
            line,
            column,
            offset: offset as u32,
            target_variable,
            allocator_expr_text,
            classified_allocator,
            returned_later,
            has_scoped_release,
            has_errdefer_release,
        });
    }

    sites
}

/// Resolves the classified allocator name an [`AllocatorOrigin`]
/// ultimately refers to, following one `DerivedFromArena` hop back to
/// the arena variable's own origin (spec §4.4 "classified allocator
/// name").
fn classified_allocator_name(tree: &ScopeTree, origin: &AllocatorOrigin) -> Option<String> {
    match origin {
        AllocatorOrigin::Parameter => Some(zigscope_patterns::PARAMETER_ALLOCATOR.to_string()),
        AllocatorOrigin::NamedInstance(name) => Some(name.clone()),
        AllocatorOrigin::Unknown => None,
        AllocatorOrigin::DerivedFromArena(scope, base) => tree
            .variables_in(*scope)
            .find(|v| v.name == *base)
            .and_then(|v| v.allocator_origin.as_ref())
            .and_then(|origin| classified_allocator_name(tree, origin)),
    }
}

/// If the call at `call_start` is the initializer of a `const`/`var`
/// declaration (`const d = try a.alloc(...)`), returns the declared
/// name; otherwise `None` (spec §4.4 "The target variable is the LHS
/// identifier if the site is the initializer of a declaration;
/// otherwise none").
fn target_variable_of(text: &str, call_start: usize) -> Option<String> {
    let line_start = text[..call_start].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &text[line_start..call_start];
    DECL_PREFIX_RE
        .captures(prefix)
        .map(|caps| caps["name"].to_string())
}

/// Slices from just past the opening `(` to its matching `)`,
/// returning `ident.verb(...)` verbatim. Falls back to the bare call
/// head if the parens are unbalanced in the remaining text.
fn call_expr_text(text: &str, open_paren: usize, call_head: &str) -> String {
    let bytes = text.as_bytes();
    let mut depth = 1i32;
    let mut i = open_paren;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return text[open_paren - call_head.len()..=i].to_string();
                }
            }
            _ => {}
        }
        i += 1;
    }
    call_head.to_string()
}

