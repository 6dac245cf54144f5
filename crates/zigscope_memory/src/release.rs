use once_cell::sync::Lazy;
use regex::Regex;

use zigscope_scope::{ScopeId, ScopeTree};
use zigscope_source::SourceContext;

use crate::util::text_mentions_ident;

static DEFER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"defer\s+([^;]+);").expect("static regex is valid"));
static ERRDEFER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"errdefer\s+([^;]+);").expect("static regex is valid"));
static BARE_FREE_VERBS: &[&str] = &["free", "deinit", "destroy"];

/// Whether `scope` directly contains a `defer`/`errdefer` statement
/// targeting `variable_name` (spec §4.3 "scoped-release statement...
/// within the same scope"). A match nested inside a descendant scope
/// does not count — `defer` there only guards that descendant's exits.
pub(crate) fn scoped_release_flags(
    ctx: &SourceContext,
    tree: &ScopeTree,
    scope: ScopeId,
    variable_name: &str,
) -> (bool, bool) {
    let s = tree.scope(scope);
    let body = ctx.text(s.start_offset as usize..s.end_offset as usize);

    let has_defer = own_scope_matches(ctx, tree, scope, s.start_offset, body, &DEFER_RE, variable_name);
    let has_errdefer =
        own_scope_matches(ctx, tree, scope, s.start_offset, body, &ERRDEFER_RE, variable_name);
    (has_defer, has_errdefer)
}

/// Whether an unconditional, non-deferred release call
/// (`target.free(...)`/`.deinit(...)`/`.destroy(...)`) appears as a
/// direct statement of `scope` — the "unconditional release on the
/// success path" clause paired with an `errdefer` (spec §4.4
/// Missing-release rule, clause b).
pub(crate) fn has_bare_success_path_release(
    ctx: &SourceContext,
    tree: &ScopeTree,
    scope: ScopeId,
    variable_name: &str,
) -> bool {
    let s = tree.scope(scope);
    let body = ctx.text(s.start_offset as usize..s.end_offset as usize);
    for verb in BARE_FREE_VERBS {
        let needle = format!("{variable_name}.{verb}");
        let mut search_from = 0usize;
        while let Some(rel) = body[search_from..].find(&needle) {
            let abs = search_from + rel;
            let line_start = body[..abs].rfind('\n').map_or(0, |i| i + 1);
            let prefix = body[line_start..abs].trim_start();
            let offset = (s.start_offset as usize + abs) as u32;
            if !prefix.starts_with("defer") && !prefix.starts_with("errdefer") && ctx.is_in_code(offset as usize) {
                let owning = tree.enclosing_scope_at(offset);
                if owning == scope {
                    return true;
                }
            }
            search_from = abs + needle.len();
        }
    }
    false
}

fn own_scope_matches(
    ctx: &SourceContext,
    tree: &ScopeTree,
    scope: ScopeId,
    scope_start: u32,
    body: &str,
    re: &Regex,
    variable_name: &str,
) -> bool {
    re.captures_iter(body).any(|caps| {
        let whole = caps.get(0).expect("group 0 always matches");
        let offset = scope_start + whole.start() as u32;
        if !ctx.is_in_code(offset as usize) {
            return false;
        }
        if tree.enclosing_scope_at(offset) != scope {
            return false;
        }
        text_mentions_ident(&caps[1], variable_name)
    })
}
