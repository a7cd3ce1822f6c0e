//! Rule compilation: from the raw rules mapping to per-scope rule tables.

use crate::matcher::NameMatcher;
use crate::scope::Scope;
use regex::Regex;
use thiserror::Error;

/// The raw rules document: type-pattern → scope-combination → name-pattern
/// → replacement-or-message.
///
/// Deserialized with `serde_json`'s `preserve_order` feature, so iteration
/// follows document order. Rule precedence across distinct type-pattern
/// keys is therefore first-seen-in-input.
pub type RawRules = serde_json::Map<String, serde_json::Value>;

/// Errors from compiling a rules document.
///
/// All variants are fatal at startup: there is no valid partial rule set
/// to fall back to.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum RuleError {
    /// A type-pattern key failed to compile as a regex.
    #[error("type pattern `{pattern}`: {source}")]
    #[diagnostic(help(
        "type patterns are regular expressions matched against canonical type strings"
    ))]
    TypePattern {
        /// The offending pattern.
        pattern: String,
        /// The regex compile error.
        source: regex::Error,
    },

    /// A name-pattern key failed to compile as a regex.
    #[error("type pattern `{type_pattern}`: name pattern `{pattern}`: {source}")]
    #[diagnostic(help(
        "name keys containing regex metacharacters are compiled as regular expressions"
    ))]
    NamePattern {
        /// The type-pattern key the name pattern belongs to.
        type_pattern: String,
        /// The offending name pattern.
        pattern: String,
        /// The regex compile error.
        source: regex::Error,
    },

    /// A scope combination contained an unrecognized token.
    #[error("scope combination `{combo}`: unknown scope `{token}`")]
    #[diagnostic(help(
        "valid scopes are param, receiver, global, local, and field, joined with `+`"
    ))]
    UnknownScope {
        /// The full `+`-joined combination.
        combo: String,
        /// The unrecognized token.
        token: String,
    },

    /// The document does not have the expected nested-map shape.
    #[error("malformed rules structure at `{context}`: expected {expected}")]
    #[diagnostic(help(
        "rules are a mapping of type pattern -> scope combination -> name pattern -> message"
    ))]
    MalformedStructure {
        /// Key path of the offending entry.
        context: String,
        /// What the entry should have been.
        expected: &'static str,
    },
}

/// A compiled rule: one type pattern and its ordered matcher list.
#[derive(Debug, Clone)]
pub struct Rule {
    type_pattern: Regex,
    matchers: Vec<NameMatcher>,
}

impl Rule {
    /// Reports whether this rule applies to the given canonical type
    /// string.
    #[must_use]
    pub fn applies_to(&self, type_display: &str) -> bool {
        self.type_pattern.is_match(type_display)
    }

    /// The rule's matcher list, literals first.
    #[must_use]
    pub fn matchers(&self) -> &[NameMatcher] {
        &self.matchers
    }
}

/// Per-scope ordered rule tables.
///
/// Built once from configuration; read-only during analysis and safe to
/// share across concurrently analyzed units. Within a scope, the first
/// registered rule whose type pattern matches a type string wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    by_scope: [Vec<Rule>; 5],
}

impl RuleSet {
    /// Compiles a raw rules document into per-scope rule tables.
    ///
    /// Rules are registered in document order; a rule naming several
    /// scopes (`global+local`) is registered under each of them. Literal
    /// name matchers are placed ahead of regex matchers inside every
    /// rule.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] on the first malformed pattern, unknown
    /// scope token, or structural problem.
    pub fn compile(raw: &RawRules) -> Result<RuleSet, RuleError> {
        let mut set = RuleSet::default();

        for (type_pattern, scopes_value) in raw {
            let type_re = Regex::new(type_pattern).map_err(|source| RuleError::TypePattern {
                pattern: type_pattern.clone(),
                source,
            })?;

            let scope_map =
                scopes_value
                    .as_object()
                    .ok_or_else(|| RuleError::MalformedStructure {
                        context: type_pattern.clone(),
                        expected: "a mapping of scope combination to name rules",
                    })?;

            for (combo, names_value) in scope_map {
                let scopes = parse_scope_combo(combo)?;
                let names =
                    names_value
                        .as_object()
                        .ok_or_else(|| RuleError::MalformedStructure {
                            context: format!("{type_pattern}.{combo}"),
                            expected: "a mapping of name pattern to message",
                        })?;

                let matchers = compile_matchers(type_pattern, combo, names)?;
                for scope in scopes {
                    set.by_scope[scope.index()].push(Rule {
                        type_pattern: type_re.clone(),
                        matchers: matchers.clone(),
                    });
                }
            }
        }

        Ok(set)
    }

    /// The ordered rule list for one scope bucket.
    #[must_use]
    pub fn rules(&self, scope: Scope) -> &[Rule] {
        &self.by_scope[scope.index()]
    }

    /// Total number of registered rules across all scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_scope.iter().map(Vec::len).sum()
    }

    /// True when no rules were registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_scope.iter().all(Vec::is_empty)
    }
}

fn parse_scope_combo(combo: &str) -> Result<Vec<Scope>, RuleError> {
    combo
        .split('+')
        .map(|token| {
            Scope::from_token(token).ok_or_else(|| RuleError::UnknownScope {
                combo: combo.to_string(),
                token: token.to_string(),
            })
        })
        .collect()
}

fn compile_matchers(
    type_pattern: &str,
    combo: &str,
    names: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<NameMatcher>, RuleError> {
    let mut literals = Vec::new();
    let mut regexes = Vec::new();

    for (name_pattern, message_value) in names {
        let message = message_value
            .as_str()
            .ok_or_else(|| RuleError::MalformedStructure {
                context: format!("{type_pattern}.{combo}.{name_pattern}"),
                expected: "a string message or replacement",
            })?;

        // A key free of metacharacters is an exact spelling; everything
        // else compiles as a pattern.
        if regex::escape(name_pattern) == name_pattern.as_str() {
            literals.push(NameMatcher::literal(name_pattern.clone(), message));
        } else {
            let re = Regex::new(name_pattern).map_err(|source| RuleError::NamePattern {
                type_pattern: type_pattern.to_string(),
                pattern: name_pattern.clone(),
                source,
            })?;
            regexes.push(NameMatcher::regex(re, message));
        }
    }

    literals.extend(regexes);
    Ok(literals)
}
