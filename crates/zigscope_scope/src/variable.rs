use crate::ids::ScopeId;

/// How a variable came to hold the allocator it holds (spec §3
/// Variable Record `AllocatorOrigin`). `None`/absent on the field is
/// not used; [`AllocatorOrigin::Unknown`] is the explicit "we looked
/// and couldn't classify it" state, kept distinct from "this variable
/// isn't an allocator at all" (represented by the field itself being
/// `Option::None` on [`VariableRecord`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocatorOrigin {
    /// The allocator came in as a function parameter.
    Parameter,
    /// `let x = <arena_ident>.allocator()` where `arena_ident` is a
    /// known arena variable declared in `scope`.
    DerivedFromArena(ScopeId, String),
    /// The initializer matched a named-allocator pattern (e.g.
    /// `std.heap.page_allocator`), classified to this canonical name.
    NamedInstance(String),
    /// Looks like an allocator-bearing declaration but the pattern
    /// matcher could not classify it.
    Unknown,
}

/// Closed set of variable declaration kinds (spec §3 Variable Record).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    LocalConst,
    LocalVar,
    Parameter,
}

/// One declared variable, const, or parameter (spec §3 Variable
/// Record). Attached to exactly one scope: the scope it was declared
/// in (spec §4.3 invariant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRecord {
    pub name: String,
    pub declaring_scope: ScopeId,
    pub decl_line: u32,
    pub decl_column: u32,
    pub kind: VariableKind,
    pub type_text: String,
    pub allocator_origin: Option<AllocatorOrigin>,
}
