//! Analysis orchestration across units.

use crate::diagnostics::Diagnostic;
use crate::dispatch::NameDispatcher;
use crate::rules::RuleSet;
use crate::syntax::{SourceUnit, UnitKind};
use crate::walker;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Runs compiled rules over syntax units.
///
/// The rule set is shared read-only across units. Every unit gets its own
/// match cache, so independent units are analyzed in parallel without
/// locking; diagnostics are collected back in selection order.
pub struct Analyzer {
    rules: RuleSet,
}

impl Analyzer {
    /// Creates an analyzer over a compiled rule set.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Analyzer { rules }
    }

    /// The compiled rule set in use.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Analyzes one unit, returning diagnostics in discovery order.
    ///
    /// A fresh match cache is created for the unit and discarded with it:
    /// canonical type strings are namespace-relative and not comparable
    /// across units.
    #[must_use]
    pub fn check_unit(&self, unit: &SourceUnit) -> Vec<Diagnostic> {
        info!("check {}", unit.id);
        let mut dispatcher = NameDispatcher::new(&self.rules);
        walker::collect_bindings(unit)
            .iter()
            .filter_map(|occ| dispatcher.dispatch(occ))
            .collect()
    }

    /// Analyzes a set of units, selecting compilation variants so that no
    /// unit is analyzed twice and none is skipped.
    ///
    /// A unit compiled together with its test sources stands in for its
    /// normal compilation; units without a test-inclusive variant are
    /// analyzed via their normal compilation. Test harness units are never
    /// analyzed.
    #[must_use]
    pub fn check_units(&self, units: &[SourceUnit]) -> Vec<Diagnostic> {
        let selected = select_units(units);
        selected
            .par_iter()
            .map(|unit| self.check_unit(unit))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Applies the two-pass variant selection policy.
fn select_units(units: &[SourceUnit]) -> Vec<&SourceUnit> {
    let mut selected = Vec::new();
    let mut with_tests: HashSet<&str> = HashSet::new();

    // First pass: test-inclusive compilations stand in for their package.
    for unit in units {
        if unit.kind == UnitKind::WithTests {
            with_tests.insert(unit.path.as_str());
            selected.push(unit);
        }
    }

    // Second pass: normal compilations not already covered.
    for unit in units {
        match unit.kind {
            UnitKind::Normal if !with_tests.contains(unit.path.as_str()) => selected.push(unit),
            UnitKind::Normal | UnitKind::WithTests => {}
            UnitKind::TestMain => debug!("skip test harness unit {}", unit.id),
        }
    }

    selected
}
