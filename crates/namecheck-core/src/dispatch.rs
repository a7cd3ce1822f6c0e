//! The caching match dispatcher.

use crate::diagnostics::Diagnostic;
use crate::matcher::NameMatcher;
use crate::rules::{Rule, RuleSet};
use crate::scope::Scope;
use crate::walker::BindingOccurrence;
use std::collections::HashMap;
use tracing::debug;

/// Resolves binding occurrences against a [`RuleSet`], memoizing the
/// winning rule per `(scope, canonical type string)`.
///
/// The cache key includes the scope tag: the same type string can have
/// different applicable rules in different scopes. A `None` cache value
/// marks a type with no applicable rule in that scope, so repeated
/// occurrences of uninteresting types return in constant time.
///
/// One dispatcher serves one analysis unit. Canonical type strings are
/// rendered relative to the unit's namespace, so cache entries must not be
/// shared across units.
pub struct NameDispatcher<'r> {
    rules: &'r RuleSet,
    cache: HashMap<(Scope, String), Option<&'r [NameMatcher]>>,
}

impl<'r> NameDispatcher<'r> {
    /// Creates a dispatcher with an empty cache.
    #[must_use]
    pub fn new(rules: &'r RuleSet) -> Self {
        NameDispatcher {
            rules,
            cache: HashMap::new(),
        }
    }

    /// Evaluates one binding occurrence, returning at most one diagnostic.
    ///
    /// Indirection wrappers are stripped from the resolved type before
    /// matching, so a pointer-to-pointer-to-T is matched exactly like T.
    /// Occurrences without a resolved type are skipped.
    pub fn dispatch(&mut self, occ: &BindingOccurrence<'_>) -> Option<Diagnostic> {
        let ty = match occ.ty {
            Some(ty) => ty,
            None => {
                debug!("{}: no resolved type for `{}`", occ.pos, occ.name);
                return None;
            }
        };

        let type_display = ty.strip_pointers().to_string();
        let matchers = self.lookup(occ.scope, &type_display)?;

        for matcher in matchers {
            if matcher.matches(occ.name) {
                return Some(Diagnostic {
                    pos: occ.pos.clone(),
                    name: occ.name.to_string(),
                    type_display,
                    message: matcher.message().to_string(),
                });
            }
        }
        None
    }

    /// Looks up or computes the winning matcher list for a scope/type
    /// pair. The first rule in the scope's list whose type pattern matches
    /// wins; later rules are never consulted for that type again.
    fn lookup(&mut self, scope: Scope, type_display: &str) -> Option<&'r [NameMatcher]> {
        let key = (scope, type_display.to_string());
        if let Some(&cached) = self.cache.get(&key) {
            match cached {
                Some(_) => debug!("{type_display}: cache hit"),
                None => debug!("{type_display}: cache hit (non-interesting)"),
            }
            return cached;
        }

        debug!("{type_display}: rules full scan");
        let resolved = self
            .rules
            .rules(scope)
            .iter()
            .find(|rule| rule.applies_to(type_display))
            .map(Rule::matchers);
        if resolved.is_none() {
            debug!("{type_display}: mark as non-interesting");
        }
        self.cache.insert(key, resolved);
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Position;
    use crate::rules::RawRules;
    use crate::syntax::TypeRef;

    fn ruleset(doc: &str) -> RuleSet {
        let raw: RawRules = serde_json::from_str(doc).unwrap();
        RuleSet::compile(&raw).unwrap()
    }

    fn occurrence<'a>(
        scope: Scope,
        name: &'a str,
        pos: &'a Position,
        ty: &'a TypeRef,
    ) -> BindingOccurrence<'a> {
        BindingOccurrence {
            scope,
            name,
            pos,
            ty: Some(ty),
        }
    }

    fn here() -> Position {
        Position {
            file: "m.src".to_string(),
            line: 3,
            column: 5,
        }
    }

    // -- Reference scenarios --

    #[test]
    fn literal_rule_flags_discouraged_param_name() {
        let rules = ruleset(r#"{"^int$": {"param": {"num": "n"}}}"#);
        let mut dispatcher = NameDispatcher::new(&rules);
        let pos = here();
        let int_ty = TypeRef::Named("int".to_string());
        let string_ty = TypeRef::Named("string".to_string());

        // A parameter already named `n` is fine.
        assert!(dispatcher
            .dispatch(&occurrence(Scope::Param, "n", &pos, &int_ty))
            .is_none());

        // `num` of type int gets the rename suggestion.
        let d = dispatcher
            .dispatch(&occurrence(Scope::Param, "num", &pos, &int_ty))
            .unwrap();
        assert_eq!(d.to_string(), "m.src:3:5: num int: rename to n");

        // `num` of type string is out of the rule's reach.
        assert!(dispatcher
            .dispatch(&occurrence(Scope::Param, "num", &pos, &string_ty))
            .is_none());
    }

    #[test]
    fn scope_combo_applies_to_named_scopes_only() {
        let rules =
            ruleset(r#"{"^error$": {"global+local": {"^(err|e)$": "use descriptive error names"}}}"#);
        let mut dispatcher = NameDispatcher::new(&rules);
        let pos = here();
        let err_ty = TypeRef::Named("error".to_string());

        let global = dispatcher
            .dispatch(&occurrence(Scope::Global, "e", &pos, &err_ty))
            .unwrap();
        let local = dispatcher
            .dispatch(&occurrence(Scope::Local, "err", &pos, &err_ty))
            .unwrap();
        assert_eq!(global.message, "use descriptive error names");
        assert_eq!(local.message, global.message);

        // `param` is not part of the combination.
        assert!(dispatcher
            .dispatch(&occurrence(Scope::Param, "err", &pos, &err_ty))
            .is_none());
    }

    // -- Matching semantics --

    #[test]
    fn pointer_wrappers_are_stripped_before_matching() {
        let rules = ruleset(r#"{"^int$": {"param": {"num": "n"}}}"#);
        let mut dispatcher = NameDispatcher::new(&rules);
        let pos = here();
        let deep = TypeRef::Pointer(Box::new(TypeRef::Pointer(Box::new(TypeRef::Named(
            "int".to_string(),
        )))));

        let d = dispatcher
            .dispatch(&occurrence(Scope::Param, "num", &pos, &deep))
            .unwrap();
        assert_eq!(d.type_display, "int");
    }

    #[test]
    fn literal_wins_over_overlapping_regex() {
        let rules = ruleset(
            r#"{"^T$": {"param": {"f.*": "avoid f-prefixed names", "foo": "bar"}}}"#,
        );
        let mut dispatcher = NameDispatcher::new(&rules);
        let pos = here();
        let ty = TypeRef::Named("T".to_string());

        let d = dispatcher
            .dispatch(&occurrence(Scope::Param, "foo", &pos, &ty))
            .unwrap();
        assert_eq!(d.message, "rename to bar");

        let d = dispatcher
            .dispatch(&occurrence(Scope::Param, "fx", &pos, &ty))
            .unwrap();
        assert_eq!(d.message, "avoid f-prefixed names");
    }

    #[test]
    fn first_registered_rule_wins_for_a_type() {
        let rules = ruleset(
            r#"{
                "int": {"param": {"x": "first"}},
                "^int$": {"param": {"x": "second"}}
            }"#,
        );
        let mut dispatcher = NameDispatcher::new(&rules);
        let pos = here();
        let ty = TypeRef::Named("int".to_string());

        for _ in 0..3 {
            let d = dispatcher
                .dispatch(&occurrence(Scope::Param, "x", &pos, &ty))
                .unwrap();
            assert_eq!(d.message, "rename to first");
        }
    }

    #[test]
    fn first_matching_matcher_wins_within_a_rule() {
        let rules = ruleset(r#"{"^T$": {"param": {"^bad$": "first wins", "b.*": "never seen"}}}"#);
        let mut dispatcher = NameDispatcher::new(&rules);
        let pos = here();
        let ty = TypeRef::Named("T".to_string());

        // Both patterns apply to `bad`; only the first produces the one
        // diagnostic for the occurrence.
        let d = dispatcher
            .dispatch(&occurrence(Scope::Param, "bad", &pos, &ty))
            .unwrap();
        assert_eq!(d.message, "first wins");
    }

    // -- Cache behavior --

    #[test]
    fn cache_keys_never_cross_scopes() {
        let rules = ruleset(r#"{"^error$": {"global": {"^e$": "bad"}}}"#);
        let pos = here();
        let err_ty = TypeRef::Named("error".to_string());

        for first in Scope::ALL {
            // Whatever scope is probed first, the cached entry must not
            // leak into the others.
            let mut dispatcher = NameDispatcher::new(&rules);
            let primed = dispatcher
                .dispatch(&occurrence(first, "e", &pos, &err_ty))
                .is_some();
            assert_eq!(primed, first == Scope::Global);

            let hit = dispatcher
                .dispatch(&occurrence(Scope::Global, "e", &pos, &err_ty))
                .is_some();
            assert!(hit);
            let miss = dispatcher
                .dispatch(&occurrence(Scope::Field, "e", &pos, &err_ty))
                .is_some();
            assert!(!miss);
        }
    }

    #[test]
    fn unresolved_types_are_skipped() {
        let rules = ruleset(r#"{".*": {"param": {".*": "everything is wrong"}}}"#);
        let mut dispatcher = NameDispatcher::new(&rules);
        let pos = here();
        let occ = BindingOccurrence {
            scope: Scope::Param,
            name: "x",
            pos: &pos,
            ty: None,
        };
        assert!(dispatcher.dispatch(&occ).is_none());
    }
}
