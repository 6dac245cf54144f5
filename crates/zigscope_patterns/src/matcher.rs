use regex::Regex;
use zigscope_diagnostics::Severity;

use crate::pattern::{NamedPattern, PatternOrigin};

/// A validation finding for one merged pattern set (spec §4.2
/// Validation). `Severity::Error` findings must abort analyzer
/// construction as a `configuration_error`; anything less severe
/// becomes a `pattern_validation_warning` issue on the first analysis
/// call that uses this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternValidationFinding {
    pub severity: Severity,
    pub message: String,
}

impl PatternValidationFinding {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

struct CompiledEntry {
    pattern: NamedPattern,
    regex: Option<Regex>,
}

/// An ordered, validated set of patterns ready for
/// [`CompiledPatternSet::classify`] (spec §4.2 Contract).
pub struct CompiledPatternSet {
    entries: Vec<CompiledEntry>,
}

impl CompiledPatternSet {
    /// Tries `text` against each pattern in order; the first match
    /// wins and its pattern name is returned.
    pub fn classify(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| matches(&entry.pattern, entry.regex.as_ref(), text))
            .map(|entry| entry.pattern.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn matches(pattern: &NamedPattern, regex: Option<&Regex>, text: &str) -> bool {
    text_matches(&pattern.pattern_text, pattern.case_sensitive, regex, text)
}

/// Low-level match predicate shared with [`crate::OwnershipMatcher`]:
/// regex (if compiled) takes precedence, otherwise plain/case-folded
/// substring matching.
pub(crate) fn text_matches(
    pattern_text: &str,
    case_sensitive: bool,
    regex: Option<&Regex>,
    text: &str,
) -> bool {
    if let Some(regex) = regex {
        return regex.is_match(text);
    }
    if case_sensitive {
        text.contains(pattern_text)
    } else {
        text.to_ascii_lowercase()
            .contains(&pattern_text.to_ascii_lowercase())
    }
}

/// Validates a merged `(pattern, origin)` list and compiles any regex
/// patterns, per spec §4.2:
/// - empty `name` or `pattern_text` → error
/// - duplicate `name` across two entries of the *same* origin → error
/// - duplicate `name` across a user entry and a default entry → warning
///   (the user entry keeps its position; the default is effectively
///   shadowed by ordering, never re-ordered by the engine)
/// - `pattern_text` of length 1 → warning
/// - regex compile failure → error
///
/// Entries whose name/pattern-text is invalid, or whose regex fails to
/// compile, are dropped from the returned [`CompiledPatternSet`] so a
/// later `classify` call never panics on a malformed pattern; the
/// findings list is how the caller learns that happened.
pub fn validate_and_compile(
    entries: Vec<(NamedPattern, PatternOrigin)>,
) -> (CompiledPatternSet, Vec<PatternValidationFinding>) {
    let mut findings = Vec::new();
    let mut seen_names: std::collections::HashMap<String, PatternOrigin> =
        std::collections::HashMap::new();
    let mut compiled = Vec::new();

    for (pattern, origin) in entries {
        if pattern.name.is_empty() {
            findings.push(PatternValidationFinding::error(
                "pattern has an empty name",
            ));
            continue;
        }
        if pattern.pattern_text.is_empty() {
            findings.push(PatternValidationFinding::error(format!(
                "pattern `{}` has an empty pattern_text",
                pattern.name
            )));
            continue;
        }
        if pattern.pattern_text.len() == 1 {
            findings.push(PatternValidationFinding::warning(format!(
                "pattern `{}` matches on a single character (`{}`); this is likely \
                 broader than intended",
                pattern.name, pattern.pattern_text
            )));
        }

        if let Some(&prior_origin) = seen_names.get(&pattern.name) {
            let message = format!("duplicate pattern name `{}`", pattern.name);
            if prior_origin == origin {
                findings.push(PatternValidationFinding::error(message));
                continue;
            }
            findings.push(PatternValidationFinding::warning(format!(
                "{message} (user override takes precedence over the built-in default by ordering)"
            )));
        }
        seen_names.insert(pattern.name.clone(), origin);

        let regex = if pattern.is_regex {
            match Regex::new(&pattern.pattern_text) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    findings.push(PatternValidationFinding::error(format!(
                        "pattern `{}` failed to compile as regex: {err}",
                        pattern.name
                    )));
                    continue;
                }
            }
        } else {
            None
        };

        compiled.push(CompiledEntry { pattern, regex });
    }

    (CompiledPatternSet { entries: compiled }, findings)
}

pub fn has_errors(findings: &[PatternValidationFinding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}
