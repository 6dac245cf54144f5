use once_cell::sync::Lazy;
use regex::Regex;

use zigscope_patterns::OwnershipMatcher;
use zigscope_scope::{Scope, ScopeId, ScopeKind, ScopeTree};
use zigscope_source::SourceContext;

use crate::util::text_mentions_ident;

static RETURN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"return\s+([^;]+);").expect("static regex is valid")
});

/// `<agg>.<field> = <rhs>;` or `<agg>[<idx>] = <rhs>;` (spec §4.4
/// point 3's "array-element patterns... and direct-field
/// assignments").
static STORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_]\w*)(?:\.[A-Za-z_]\w*|\[[^\]\n]*\])\s*=\s*([^;]+);")
        .expect("static regex is valid")
});

/// `true` when `offset` is immediately preceded (ignoring whitespace)
/// by the `return` keyword — the call itself is the return expression
/// (spec §4.4 point 4).
pub(crate) fn site_is_return_expression(ctx: &SourceContext, offset: u32) -> bool {
    let text = ctx.text(0..offset as usize);
    let trimmed = text.trim_end();
    trimmed
        .strip_suffix("return")
        .is_some_and(|before| before.chars().next_back().is_none_or(|c| !c.is_alphanumeric() && c != '_'))
}

/// `true` when `target` is returned directly, or stored into an
/// aggregate field/element that is itself later returned, anywhere in
/// the function enclosing `scope` (spec §4.4 points 2-3). Purely
/// syntactic: conservative, so missed transfers surface as warnings
/// rather than silently wrong suppressions.
pub(crate) fn returned_on_any_path(ctx: &SourceContext, tree: &ScopeTree, scope: ScopeId, target: &str) -> bool {
    let Some(function) = nearest_function_scope(tree, scope) else {
        return false;
    };
    let body = ctx.text(function.start_offset as usize..function.end_offset as usize);
    returned_directly(body, target) || stored_then_returned(body, target)
}

fn returned_directly(body: &str, target: &str) -> bool {
    RETURN_RE
        .captures_iter(body)
        .any(|caps| text_mentions_ident(&caps[1], target))
}

fn stored_then_returned(body: &str, target: &str) -> bool {
    STORE_RE.captures_iter(body).any(|caps| {
        let aggregate = &caps[1];
        let rhs = &caps[2];
        text_mentions_ident(rhs, target) && returned_directly(body, aggregate)
    })
}

/// `true` if the enclosing function's name or return-type text matches
/// an active ownership pattern (spec §4.4 point 1).
pub(crate) fn function_pattern_matches(
    tree: &ScopeTree,
    scope: ScopeId,
    matcher: &OwnershipMatcher,
) -> bool {
    let Some(function) = nearest_function_scope(tree, scope) else {
        return false;
    };
    if let Some(name) = &function.name {
        if matcher.matches_function_name(name).is_some() {
            return true;
        }
    }
    if let Some(return_type) = &function.return_type_text {
        if matcher.matches_return_type(return_type).is_some() {
            return true;
        }
    }
    false
}

pub(crate) fn nearest_function_scope(tree: &ScopeTree, scope: ScopeId) -> Option<&Scope> {
    let mut current = Some(scope);
    while let Some(id) = current {
        let s = tree.scope(id);
        if s.kind == ScopeKind::Function {
            return Some(s);
        }
        current = s.parent;
    }
    None
}
