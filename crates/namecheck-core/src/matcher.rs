//! Name matchers, the smallest rule-evaluation unit.

use regex::Regex;

/// A single name matcher inside a rule.
///
/// A closed two-variant type: an exact literal comparison, or a substring
/// regex. Immutable after construction. Within a rule's matcher list all
/// literals are placed ahead of regexes so the cheap checks run first.
#[derive(Debug, Clone)]
pub enum NameMatcher {
    /// Matches a name exactly (case-sensitive) and suggests the configured
    /// replacement spelling.
    Literal {
        /// The exact spelling this matcher fires on.
        from: String,
        /// Pre-rendered warning, `rename to <replacement>`.
        message: String,
    },
    /// Matches a compiled pattern anywhere in the name.
    Regex {
        /// Compiled name pattern, substring semantics.
        re: Regex,
        /// Caller-supplied warning, used verbatim.
        message: String,
    },
}

impl NameMatcher {
    /// Creates a literal matcher suggesting a rename to `replacement`.
    #[must_use]
    pub fn literal(from: impl Into<String>, replacement: &str) -> Self {
        NameMatcher::Literal {
            from: from.into(),
            message: format!("rename to {replacement}"),
        }
    }

    /// Creates a regex matcher with a verbatim warning message.
    #[must_use]
    pub fn regex(re: Regex, message: impl Into<String>) -> Self {
        NameMatcher::Regex {
            re,
            message: message.into(),
        }
    }

    /// Reports whether `name` triggers this matcher.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Literal { from, .. } => from == name,
            NameMatcher::Regex { re, .. } => re.is_match(name),
        }
    }

    /// The warning to emit when this matcher fires.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            NameMatcher::Literal { message, .. } | NameMatcher::Regex { message, .. } => message,
        }
    }

    /// True for the literal variant.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, NameMatcher::Literal { .. })
    }
}
