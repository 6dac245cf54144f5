use zigscope_patterns::{
    default_allocator_patterns, default_ownership_patterns, has_errors, validate_and_compile,
    validate_and_compile_ownership, CompiledPatternSet, OwnershipMatcher, PatternOrigin,
    PatternValidationFinding,
};

use crate::config::Config;
use crate::error::ConfigurationError;

/// A [`Config`] that has passed validation: its pattern sets are
/// merged, deduplicated, and regex-compiled exactly once (spec §4.7
/// "Validation runs once at analyzer construction").
pub struct ValidatedConfig {
    pub config: Config,
    pub allocator_patterns: CompiledPatternSet,
    pub ownership_patterns: OwnershipMatcher,
    /// Non-fatal pattern findings (duplicate user/default names,
    /// single-character patterns). Surfaced as `pattern_validation_warning`
    /// issues by the first analysis call that uses this config, since
    /// validation itself predates any particular file.
    pub pattern_warnings: Vec<PatternValidationFinding>,
}

/// Validates `config`, merging user pattern sets with built-in
/// defaults in the order spec §4.2 requires (caller-supplied first,
/// then defaults, minus anything in `disabled_default_patterns`).
///
/// Returns `Err` only for conditions spec §4.7/§7 calls a
/// `configuration_error`: a malformed pattern set, an empty
/// `allowed_categories` while testing checks are enabled, or
/// `max_depth == 0`.
pub fn validate(config: Config) -> Result<ValidatedConfig, ConfigurationError> {
    if config.max_depth == 0 {
        return Err(ConfigurationError::InvalidMaxDepth);
    }
    if config.testing.check_naming || config.testing.check_category_presence {
        if config.testing.allowed_categories.is_empty() {
            return Err(ConfigurationError::EmptyAllowedCategories);
        }
    }

    let mut allocator_entries: Vec<_> = config
        .memory
        .allocator_patterns
        .iter()
        .cloned()
        .map(|p| (p, PatternOrigin::UserSupplied))
        .collect();
    if config.memory.use_default_allocator_patterns {
        allocator_entries.extend(
            default_allocator_patterns()
                .into_iter()
                .filter(|p| !config.memory.disabled_default_patterns.contains(&p.name))
                .map(|p| (p, PatternOrigin::BuiltInDefault)),
        );
    }
    let (allocator_patterns, allocator_findings) = validate_and_compile(allocator_entries);
    if has_errors(&allocator_findings) {
        return Err(ConfigurationError::PatternValidation(join_errors(
            &allocator_findings,
        )));
    }

    let mut ownership_entries: Vec<_> = config
        .memory
        .ownership_patterns
        .iter()
        .cloned()
        .map(|p| (p, PatternOrigin::UserSupplied))
        .collect();
    if config.memory.use_default_ownership_patterns {
        ownership_entries.extend(
            default_ownership_patterns()
                .into_iter()
                .filter(|p| !config.memory.disabled_default_patterns.contains(&p.name))
                .map(|p| (p, PatternOrigin::BuiltInDefault)),
        );
    }
    let (ownership_patterns, ownership_findings) =
        validate_and_compile_ownership(ownership_entries);
    if has_errors(&ownership_findings) {
        return Err(ConfigurationError::PatternValidation(join_errors(
            &ownership_findings,
        )));
    }

    let mut pattern_warnings = allocator_findings;
    pattern_warnings.extend(ownership_findings);

    Ok(ValidatedConfig {
        config,
        allocator_patterns,
        ownership_patterns,
        pattern_warnings,
    })
}

fn join_errors(findings: &[PatternValidationFinding]) -> String {
    findings
        .iter()
        .filter(|f| f.severity == zigscope_diagnostics::Severity::Error)
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
