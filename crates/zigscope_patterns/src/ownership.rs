use regex::Regex;

use crate::matcher::{text_matches, PatternValidationFinding};
use crate::pattern::{OwnershipPattern, OwnershipTarget, PatternOrigin};

struct CompiledOwnershipEntry {
    pattern: OwnershipPattern,
    regex: Option<Regex>,
}

/// Validated, ordered ownership-transfer patterns (spec §3 Ownership
/// Pattern). Separate from [`crate::CompiledPatternSet`] because each
/// entry additionally carries which half of a function declaration it
/// matches against.
pub struct OwnershipMatcher {
    entries: Vec<CompiledOwnershipEntry>,
}

impl OwnershipMatcher {
    pub fn matches_function_name(&self, name: &str) -> Option<&str> {
        self.classify(OwnershipTarget::FunctionName, name)
    }

    pub fn matches_return_type(&self, return_type_text: &str) -> Option<&str> {
        self.classify(OwnershipTarget::ReturnType, return_type_text)
    }

    fn classify(&self, target: OwnershipTarget, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.pattern.target == target)
            .find(|entry| {
                text_matches(
                    &entry.pattern.pattern_text,
                    entry.pattern.case_sensitive,
                    entry.regex.as_ref(),
                    text,
                )
            })
            .map(|entry| entry.pattern.name.as_str())
    }
}

/// Same validation rules as [`crate::validate_and_compile`], applied to
/// [`OwnershipPattern`]s: empty name/pattern_text is an error, a
/// same-origin duplicate name is an error, a user/default duplicate is
/// a warning, single-character patterns warn, and a regex that fails
/// to compile is an error and excludes that entry.
pub fn validate_and_compile_ownership(
    entries: Vec<(OwnershipPattern, PatternOrigin)>,
) -> (OwnershipMatcher, Vec<PatternValidationFinding>) {
    let mut findings = Vec::new();
    let mut seen_names: std::collections::HashMap<String, PatternOrigin> =
        std::collections::HashMap::new();
    let mut compiled = Vec::new();

    for (pattern, origin) in entries {
        if pattern.name.is_empty() {
            findings.push(finding_error("ownership pattern has an empty name"));
            continue;
        }
        if pattern.pattern_text.is_empty() {
            findings.push(finding_error(format!(
                "ownership pattern `{}` has an empty pattern_text",
                pattern.name
            )));
            continue;
        }
        if pattern.pattern_text.len() == 1 {
            findings.push(finding_warning(format!(
                "ownership pattern `{}` matches on a single character",
                pattern.name
            )));
        }

        if let Some(&prior_origin) = seen_names.get(&pattern.name) {
            let message = format!("duplicate ownership pattern name `{}`", pattern.name);
            if prior_origin == origin {
                findings.push(finding_error(message));
                continue;
            }
            findings.push(finding_warning(format!(
                "{message} (user override takes precedence by ordering)"
            )));
        }
        seen_names.insert(pattern.name.clone(), origin);

        let regex = if pattern.is_regex {
            match Regex::new(&pattern.pattern_text) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    findings.push(finding_error(format!(
                        "ownership pattern `{}` failed to compile as regex: {err}",
                        pattern.name
                    )));
                    continue;
                }
            }
        } else {
            None
        };

        compiled.push(CompiledOwnershipEntry { pattern, regex });
    }

    (OwnershipMatcher { entries: compiled }, findings)
}

fn finding_error(message: impl Into<String>) -> PatternValidationFinding {
    PatternValidationFinding {
        severity: zigscope_diagnostics::Severity::Error,
        message: message.into(),
    }
}

fn finding_warning(message: impl Into<String>) -> PatternValidationFinding {
    PatternValidationFinding {
        severity: zigscope_diagnostics::Severity::Warning,
        message: message.into(),
    }
}
