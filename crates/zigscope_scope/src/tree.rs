use rustc_hash::FxHashMap;

use crate::ids::ScopeId;
use crate::scope::{Scope, ScopeKind};
use crate::variable::{AllocatorOrigin, VariableRecord};

/// Aggregate counters over a built tree (spec §4.3 `stats()`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeTreeStats {
    pub total_scopes: u32,
    pub max_depth: u32,
    pub variable_count: u32,
}

/// Read-only tree of [`Scope`]s plus their [`VariableRecord`]s (spec
/// §4.3 Contract). Scopes live in a flat arena indexed by [`ScopeId`];
/// there is no pointer-based parent/child linkage (spec §9).
pub struct ScopeTree {
    scopes: Vec<Scope>,
    variables: Vec<VariableRecord>,
    /// Index from scope to the variables declared directly in it, in
    /// declaration order. Built once after scanning so query methods
    /// don't have to filter the full variable list every call.
    vars_by_scope: FxHashMap<ScopeId, Vec<usize>>,
}

impl ScopeTree {
    pub(crate) fn new(scopes: Vec<Scope>, variables: Vec<VariableRecord>) -> Self {
        let mut vars_by_scope: FxHashMap<ScopeId, Vec<usize>> = FxHashMap::default();
        for (idx, var) in variables.iter().enumerate() {
            vars_by_scope.entry(var.declaring_scope).or_default().push(idx);
        }
        Self {
            scopes,
            variables,
            vars_by_scope,
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::new(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn all_scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn scopes_of_kind(&self, kind: ScopeKind) -> impl Iterator<Item = &Scope> {
        self.scopes.iter().filter(move |s| s.kind == kind)
    }

    /// The deepest scope whose `[start_offset, end_offset)` contains
    /// `offset`, walking from the root down through children (spec
    /// §4.3 `enclosing_scope_at`).
    pub fn enclosing_scope_at(&self, offset: u32) -> ScopeId {
        let mut current = self.root();
        loop {
            let scope = self.scope(current);
            let next = scope
                .children
                .iter()
                .find(|&&child| self.scope(child).contains_offset(offset));
            match next {
                Some(&child) => current = child,
                None => return current,
            }
        }
    }

    /// Every variable declared in `scope` or one of its ancestors,
    /// innermost first (spec §4.3 `variables_visible_at`, approximated
    /// as "visible from this scope" rather than enforcing
    /// declaration-before-use ordering within a single scope — this is
    /// a syntactic tracker, not a data-flow engine, spec §1).
    pub fn variables_visible_at(&self, offset: u32) -> Vec<&VariableRecord> {
        let mut out = Vec::new();
        let mut current = Some(self.enclosing_scope_at(offset));
        while let Some(id) = current {
            if let Some(indices) = self.vars_by_scope.get(&id) {
                out.extend(indices.iter().map(|&i| &self.variables[i]));
            }
            current = self.scope(id).parent;
        }
        out
    }

    /// Resolves `variable_name`'s [`AllocatorOrigin`] as visible at
    /// `offset`, searching from the innermost enclosing scope outward
    /// (spec §4.3 `allocator_origin_of`).
    pub fn allocator_origin_of(&self, variable_name: &str, offset: u32) -> Option<&AllocatorOrigin> {
        self.variables_visible_at(offset)
            .into_iter()
            .find(|v| v.name == variable_name)
            .and_then(|v| v.allocator_origin.as_ref())
    }

    /// Looks up a declared variable by name visible from `scope`,
    /// walking outward through ancestors. Used internally while
    /// scanning to resolve arena-derivation parents (spec §4.3
    /// "`<ident>` is a known arena variable in an enclosing scope").
    pub(crate) fn lookup_variable(&self, name: &str, scope: ScopeId) -> Option<&VariableRecord> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(indices) = self.vars_by_scope.get(&id) {
                if let Some(&idx) = indices.iter().find(|&&i| self.variables[i].name == name) {
                    return Some(&self.variables[idx]);
                }
            }
            current = self.scope(id).parent;
        }
        None
    }

    pub fn variables(&self) -> &[VariableRecord] {
        &self.variables
    }

    pub fn variables_in(&self, scope: ScopeId) -> impl Iterator<Item = &VariableRecord> {
        self.vars_by_scope
            .get(&scope)
            .into_iter()
            .flat_map(|indices| indices.iter().map(|&i| &self.variables[i]))
    }

    pub fn stats(&self) -> ScopeTreeStats {
        ScopeTreeStats {
            total_scopes: self.scopes.len() as u32,
            max_depth: self.scopes.iter().map(|s| s.depth).max().unwrap_or(0),
            variable_count: self.variables.len() as u32,
        }
    }
}
