//! Lightweight Checker
//!
//! Decides canonical formulas that need no solver: constant formulas and
//! formulas without free variables. Anything else is left undecided.

use crate::features::smt::domain::{Model, SatOutcome};
use crate::features::symbolic::{Assignment, ConcreteEvaluator, Guard, IntSemantics};

pub struct LightweightChecker {
    semantics: IntSemantics,
}

impl LightweightChecker {
    pub fn new(semantics: IntSemantics) -> Self {
        Self { semantics }
    }

    /// `None` when the formula still needs the solver
    pub fn check(&self, formula: &Guard) -> Option<SatOutcome> {
        match formula {
            Guard::BoolLiteral(false) => Some(SatOutcome::Unsat),
            Guard::BoolLiteral(true) => Some(SatOutcome::sat(Model::new())),
            f if f.is_concrete() => {
                let env = Assignment::new();
                match ConcreteEvaluator::new(self.semantics, &env).eval_guard(f)? {
                    true => Some(SatOutcome::sat(Model::new())),
                    false => Some(SatOutcome::Unsat),
                }
            }
            _ => None,
        }
    }
}
