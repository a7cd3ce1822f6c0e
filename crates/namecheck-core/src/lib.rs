//! # namecheck-core
//!
//! Core engine for namecheck, a convention-driven identifier naming linter.
//!
//! The engine evaluates identifier names against user-supplied conventions
//! keyed by the identifier's resolved type. It has three parts:
//!
//! - [`RuleSet::compile`] turns the raw rules mapping into per-scope,
//!   priority-ordered rule tables
//! - [`collect_bindings`] walks a resolved syntax unit and classifies every
//!   binding occurrence into one of five scope buckets
//! - [`NameDispatcher`] resolves each occurrence against the rule tables,
//!   memoizing the winning rule per `(scope, canonical type string)`
//!
//! [`Analyzer`] ties the three together across units. Source parsing and
//! type resolution stay external: an analysis front-end supplies units in
//! the [`syntax`] data shape, with resolved types attached to bindings.
//!
//! ## Example
//!
//! ```ignore
//! use namecheck_core::{Analyzer, RawRules, RuleSet};
//!
//! let raw: RawRules = serde_json::from_str(rules_json)?;
//! let analyzer = Analyzer::new(RuleSet::compile(&raw)?);
//!
//! for diagnostic in analyzer.check_units(&units) {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod diagnostics;
mod dispatch;
mod matcher;
mod rules;
mod scope;
mod walker;

pub mod syntax;

pub use analyzer::Analyzer;
pub use diagnostics::{Diagnostic, Position};
pub use dispatch::NameDispatcher;
pub use matcher::NameMatcher;
pub use rules::{RawRules, Rule, RuleError, RuleSet};
pub use scope::Scope;
pub use walker::{collect_bindings, BindingOccurrence};
