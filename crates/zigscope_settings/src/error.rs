use thiserror::Error;

/// Configuration errors abort analyzer construction before any issue
/// is emitted (spec §4.7, §7 Taxonomy).
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown configuration option: {0}")]
    UnknownOption(String),

    #[error("{0}")]
    PatternValidation(String),

    #[error("max_depth must be greater than zero")]
    InvalidMaxDepth,

    #[error("allowed_categories must not be empty when testing checks are enabled")]
    EmptyAllowedCategories,
}
