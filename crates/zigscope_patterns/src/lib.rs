//! Identifier/expression pattern matching shared by the memory and
//! testing analyzers (spec §4.2).

mod defaults;
mod matcher;
mod ownership;
mod pattern;

pub use defaults::{default_allocator_patterns, default_ownership_patterns, PARAMETER_ALLOCATOR};
pub use matcher::{has_errors, validate_and_compile, CompiledPatternSet, PatternValidationFinding};
pub use ownership::{validate_and_compile_ownership, OwnershipMatcher};
pub use pattern::{AllocatorPattern, NamedPattern, OwnershipPattern, OwnershipTarget, PatternOrigin};
