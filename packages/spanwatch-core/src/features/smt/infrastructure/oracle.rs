//! Satisfiability Oracle
//!
//! Decides `path ∧ alternative` in two stages:
//!
//! ```text
//! Stage 1: Lightweight   constant folding + concrete evaluation
//!    ↓ undecided
//! Stage 2: Backend       Z3 (per-call timeout, fixed seed)
//! ```
//!
//! Formulas are canonicalized before either stage, so equal formulas are
//! decided identically.

use super::lightweight_checker::LightweightChecker;
use super::solvers::ConstraintSolver;
use crate::errors::Result;
use crate::features::smt::domain::SatOutcome;
use crate::features::symbolic::{canonicalize_guard, Guard, IntSemantics, Sort, VarId};
use std::collections::BTreeMap;
use tracing::trace;

/// Per-oracle statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OracleStats {
    pub total_queries: usize,
    pub lightweight_hits: usize,
    pub solver_hits: usize,
    pub unknown_results: usize,
}

impl OracleStats {
    /// Accumulate another oracle's counts
    pub fn merge(&mut self, other: &OracleStats) {
        self.total_queries += other.total_queries;
        self.lightweight_hits += other.lightweight_hits;
        self.solver_hits += other.solver_hits;
        self.unknown_results += other.unknown_results;
    }

    /// Percentage of queries resolved by each stage
    pub fn hit_rates(&self) -> HitRates {
        if self.total_queries == 0 {
            return HitRates::default();
        }
        let total = self.total_queries as f64;
        HitRates {
            lightweight: (self.lightweight_hits as f64 / total) * 100.0,
            solver: (self.solver_hits as f64 / total) * 100.0,
            unknown: (self.unknown_results as f64 / total) * 100.0,
        }
    }
}

/// Hit rate percentages
#[derive(Debug, Default, Clone, Copy)]
pub struct HitRates {
    pub lightweight: f64,
    pub solver: f64,
    pub unknown: f64,
}

pub struct SatOracle {
    lightweight: LightweightChecker,
    backend: Box<dyn ConstraintSolver>,
    stats: OracleStats,
}

impl SatOracle {
    pub fn new(backend: Box<dyn ConstraintSolver>, semantics: IntSemantics) -> Self {
        Self {
            lightweight: LightweightChecker::new(semantics),
            backend,
            stats: OracleStats::default(),
        }
    }

    /// Decide `path ∧ alternative`
    pub fn decide(&mut self, path: &Guard, alternative: &Guard) -> Result<SatOutcome> {
        self.decide_formula(&Guard::and(vec![path.clone(), alternative.clone()]))
    }

    /// Decide an arbitrary formula. Ill-sorted formulas fail with
    /// `TypeMismatch` before any solver work.
    pub fn decide_formula(&mut self, formula: &Guard) -> Result<SatOutcome> {
        self.stats.total_queries += 1;

        formula.validate()?;
        let mut free_vars = BTreeMap::new();
        formula.collect_vars(&mut free_vars)?;
        let canonical = canonicalize_guard(formula);
        let mut vars = BTreeMap::new();
        canonical.collect_vars(&mut vars)?;

        // Stage 1
        if let Some(outcome) = self.lightweight.check(&canonical) {
            self.stats.lightweight_hits += 1;
            trace!(result = outcome.label(), "Decided without solver");
            return Ok(complete_model(outcome, &free_vars));
        }

        // Stage 2
        let outcome = self.backend.check(&canonical, &vars)?;
        if outcome.is_unknown() {
            self.stats.unknown_results += 1;
        } else {
            self.stats.solver_hits += 1;
        }
        trace!(
            backend = self.backend.name(),
            vars = vars.len(),
            result = outcome.label(),
            "Decided by solver"
        );
        Ok(complete_model(outcome, &free_vars))
    }

    pub fn stats(&self) -> &OracleStats {
        &self.stats
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

/// Bind every free variable the canonical form dropped (`n == n`, `x || true`).
/// The formula no longer constrains them, so any value of the right sort works.
fn complete_model(outcome: SatOutcome, free_vars: &BTreeMap<VarId, Sort>) -> SatOutcome {
    match outcome {
        SatOutcome::Sat { mut model } => {
            for (name, sort) in free_vars {
                model
                    .entry(name.clone())
                    .or_insert_with(|| sort.default_value());
            }
            SatOutcome::sat(model)
        }
        other => other,
    }
}
