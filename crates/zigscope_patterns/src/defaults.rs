use crate::pattern::{NamedPattern, OwnershipPattern, OwnershipTarget};

/// Name reserved for the "allocator obtained from a parameter" case
/// (spec §9 Open Question: "parameter-typed allocators are allowed by
/// default via a dedicated pattern name"). Not a textual match pattern
/// — the scope tracker assigns this classification directly from
/// `AllocatorOrigin::Parameter` — but it still needs a stable name so
/// `allowed_allocators` can refer to it.
pub const PARAMETER_ALLOCATOR: &str = "parameter_allocator";

/// Built-in allocator name patterns, tried in this order after any
/// caller-supplied patterns (spec §4.2).
pub fn default_allocator_patterns() -> Vec<NamedPattern> {
    vec![
        NamedPattern::new("gpa", "(?i)general_purpose_allocator|generalpurposeallocator").regex(),
        NamedPattern::new("page_allocator", "page_allocator"),
        NamedPattern::new("arena_allocator", "ArenaAllocator"),
        NamedPattern::new("c_allocator", "c_allocator"),
        NamedPattern::new("fixed_buffer_allocator", "FixedBufferAllocator"),
        NamedPattern::new("testing_allocator", "testing.allocator"),
    ]
}

/// Built-in ownership-transfer patterns: factory-style function-name
/// prefixes and owned-looking return types (spec §3 Ownership
/// Pattern).
pub fn default_ownership_patterns() -> Vec<OwnershipPattern> {
    vec![
        OwnershipPattern::new("factory_create", "create", OwnershipTarget::FunctionName),
        OwnershipPattern::new("factory_make", "make", OwnershipTarget::FunctionName),
        OwnershipPattern::new("factory_init", "init", OwnershipTarget::FunctionName),
        OwnershipPattern::new("factory_get", "get", OwnershipTarget::FunctionName),
        OwnershipPattern::new("factory_build", "build", OwnershipTarget::FunctionName),
        OwnershipPattern::new("factory_new", "new", OwnershipTarget::FunctionName),
        OwnershipPattern::new("owned_slice_return", "[]u8", OwnershipTarget::ReturnType),
        OwnershipPattern::new("owned_pointer_return", "!*", OwnershipTarget::ReturnType),
    ]
}
