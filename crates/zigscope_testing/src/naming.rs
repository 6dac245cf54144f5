use once_cell::sync::Lazy;
use regex::Regex;

/// `"<category>: <subject>: <description>"` (spec §4.5 Naming shape
/// check). Category and subject are single words/idents; description
/// is free text to the end of the name.
static FULL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<category>[A-Za-z0-9_]+):\s*(?P<subject>[^:]+):\s*(?P<description>.+)$")
        .expect("static regex is valid"));

/// A name with no `:` at all, or with a leading category-like prefix
/// missing its separator — used only to distinguish "no category"
/// from "malformed shape" in diagnostic messages.
static HAS_COLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(":").expect("static regex is valid"));

/// Outcome of parsing one test name against the naming shape (spec
/// §4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameShape {
    /// Matched `"<category>: <subject>: <description>"` in full.
    WellFormed { category: String },
    /// No `<category>:` prefix could be found at all.
    MissingCategory,
    /// A `:`-separated prefix exists but the full three-part shape
    /// doesn't parse (e.g. missing the second segment).
    Malformed,
}

/// Parses `name` per spec §4.5's naming shape.
pub fn parse_name_shape(name: &str) -> NameShape {
    if let Some(caps) = FULL_SHAPE_RE.captures(name) {
        return NameShape::WellFormed {
            category: caps["category"].trim().to_string(),
        };
    }
    if HAS_COLON_RE.is_match(name) {
        NameShape::Malformed
    } else {
        NameShape::MissingCategory
    }
}
