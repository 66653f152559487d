//! Z3 SMT Solver Backend
//!
//! Owns one Z3 `Context` for the lifetime of a worker. Every query gets a
//! fresh `Solver` on that context, configured with the per-call timeout and
//! the fixed random seed, so queries never see each other's assertions.
//!
//! Only available when compiled with `--features z3` (default).

#![cfg(feature = "z3")]

use super::{ConstraintSolver, SolverSettings};
use crate::errors::Result;
use crate::features::smt::domain::{Model, SatOutcome, UnknownReason};
use crate::features::symbolic::{
    sign_extend, ConcreteValue, Guard, IntSemantics, Sort, Term, VarId, Z3Lowering,
};
use std::collections::BTreeMap;
use tracing::{debug, trace};
use z3::ast;
use z3::{Config, Context, Params, SatResult, Solver};

/// Z3 solver backend
pub struct Z3Backend {
    context: Context,
    settings: SolverSettings,
}

impl Z3Backend {
    pub fn new(settings: SolverSettings) -> Self {
        let cfg = Config::new();
        Self {
            context: Context::new(&cfg),
            settings,
        }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    fn read_model<'ctx>(
        &'ctx self,
        solver: &Solver<'ctx>,
        lowering: &Z3Lowering<'ctx>,
        vars: &BTreeMap<VarId, Sort>,
    ) -> Option<Model> {
        let z3_model = solver.get_model()?;
        let mut model = Model::new();
        for (name, sort) in vars {
            let term = lowering.var(name, *sort);
            let value = read_value(&z3_model, &term, self.settings.semantics)?;
            model.insert(name.clone(), value);
        }
        Some(model)
    }

    /// Unbounded Int witnesses may not fit in `i64`. Ask once more for one
    /// that does; a formula whose every witness is larger stays UNKNOWN.
    fn recheck_in_i64_range<'ctx>(
        &'ctx self,
        solver: &Solver<'ctx>,
        lowering: &Z3Lowering<'ctx>,
        vars: &BTreeMap<VarId, Sort>,
    ) -> SatOutcome {
        let declined = || {
            SatOutcome::unknown(UnknownReason::SolverDeclined(
                "model value outside the 64-bit range".to_string(),
            ))
        };

        let min = ast::Int::from_i64(&self.context, i64::MIN);
        let max = ast::Int::from_i64(&self.context, i64::MAX);
        let mut bounded = 0;
        for (name, sort) in vars {
            if let Term::Int(t) = lowering.var(name, *sort) {
                solver.assert(&t.ge(&min));
                solver.assert(&t.le(&max));
                bounded += 1;
            }
        }
        if bounded == 0 {
            return declined();
        }

        debug!(bounded, "Re-checking with Int variables bounded to i64");
        match solver.check() {
            SatResult::Sat => self
                .read_model(solver, lowering, vars)
                .map(SatOutcome::sat)
                .unwrap_or_else(declined),
            _ => declined(),
        }
    }

    fn configure(&self, solver: &Solver<'_>) {
        let mut params = Params::new(&self.context);
        let timeout = u32::try_from(self.settings.timeout_ms).unwrap_or(u32::MAX);
        params.set_u32("timeout", timeout);
        params.set_u32("random_seed", self.settings.seed);
        solver.set_params(&params);
    }
}

/// Map Z3's reason string onto an unknown reason
pub fn classify_unknown(reason: Option<String>) -> UnknownReason {
    match reason {
        Some(r) if r.contains("timeout") || r.contains("canceled") => UnknownReason::Timeout,
        Some(r) => UnknownReason::SolverDeclined(r),
        None => UnknownReason::SolverDeclined("no reason given".to_string()),
    }
}

fn read_value(model: &z3::Model<'_>, term: &Term<'_>, semantics: IntSemantics) -> Option<ConcreteValue> {
    match term {
        Term::Str(t) => model.eval(t, true)?.as_string().map(ConcreteValue::Str),
        Term::Int(t) => model.eval(t, true)?.as_i64().map(ConcreteValue::Int),
        Term::Bv(t) => {
            let bits = match semantics {
                IntSemantics::Wrapping { bits } => bits,
                IntSemantics::Unbounded => 64,
            };
            let raw = model.eval(t, true)?.as_u64()?;
            Some(ConcreteValue::Int(sign_extend(raw, bits)))
        }
        Term::Bool(t) => model.eval(t, true)?.as_bool().map(ConcreteValue::Bool),
    }
}

impl ConstraintSolver for Z3Backend {
    fn name(&self) -> &'static str {
        "Z3"
    }

    fn check(&mut self, formula: &Guard, vars: &BTreeMap<VarId, Sort>) -> Result<SatOutcome> {
        let lowering = Z3Lowering::new(&self.context, self.settings.semantics);
        let lowered = lowering.lower_guard(formula)?;

        let solver = Solver::new(&self.context);
        self.configure(&solver);
        solver.assert(&lowered);
        trace!(formula = %lowered, "Z3 query");

        let outcome = match solver.check() {
            SatResult::Unsat => SatOutcome::Unsat,
            SatResult::Unknown => {
                let reason = classify_unknown(solver.get_reason_unknown());
                debug!(%reason, "Z3 returned unknown");
                SatOutcome::unknown(reason)
            }
            SatResult::Sat => match self.read_model(&solver, &lowering, vars) {
                Some(model) => SatOutcome::sat(model),
                None => self.recheck_in_i64_range(&solver, &lowering, vars),
            },
        };
        Ok(outcome)
    }
}
