use std::fmt;

/// Dense, stable identifier for a [`crate::Scope`]: an index into the
/// [`crate::ScopeTree`]'s flat arena rather than a pointer (spec §9
/// "Cyclic or back-referential structures" — `ScopeId` everywhere
/// instead of pointers removes the borrow-graph cycles a
/// parent/child/arena-derivation pointer web would otherwise need).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("scope arena exceeds u32::MAX entries"))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}
