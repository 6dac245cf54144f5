/// A named, orderable match rule: substring by default, regex when
/// `is_regex` is set, ASCII case-folded on both sides when
/// `case_sensitive` is false (spec §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields, rename_all = "kebab-case"))]
pub struct NamedPattern {
    pub name: String,
    pub pattern_text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_regex: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub case_sensitive: bool,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl NamedPattern {
    pub fn new(name: impl Into<String>, pattern_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern_text: pattern_text.into(),
            is_regex: false,
            case_sensitive: true,
        }
    }

    #[must_use]
    pub fn regex(mut self) -> Self {
        self.is_regex = true;
        self
    }

    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

/// Allocator patterns classify the identifier/expression at an
/// allocation site (spec §3 Allocator Pattern, §4.2).
pub type AllocatorPattern = NamedPattern;

/// What part of a function declaration an [`OwnershipPattern`] matches
/// against (spec §3 "Matches either function name... or return-type
/// text").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OwnershipTarget {
    FunctionName,
    ReturnType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields, rename_all = "kebab-case"))]
pub struct OwnershipPattern {
    pub name: String,
    pub pattern_text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_regex: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_true_pub"))]
    pub case_sensitive: bool,
    pub target: OwnershipTarget,
}

#[cfg(feature = "serde")]
fn default_true_pub() -> bool {
    true
}

impl OwnershipPattern {
    pub fn new(
        name: impl Into<String>,
        pattern_text: impl Into<String>,
        target: OwnershipTarget,
    ) -> Self {
        Self {
            name: name.into(),
            pattern_text: pattern_text.into(),
            is_regex: false,
            case_sensitive: true,
            target,
        }
    }

    pub fn as_named(&self) -> NamedPattern {
        NamedPattern {
            name: self.name.clone(),
            pattern_text: self.pattern_text.clone(),
            is_regex: self.is_regex,
            case_sensitive: self.case_sensitive,
        }
    }
}

/// Whether a pattern came from the caller's configuration or from this
/// crate's built-in defaults. Only used at validation/merge time — it
/// is not part of the wire-visible [`NamedPattern`]/[`OwnershipPattern`]
/// shape from spec §3, since callers never author this distinction
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOrigin {
    UserSupplied,
    BuiltInDefault,
}
