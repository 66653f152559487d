//! Solver backends
//!
//! A backend decides one canonical formula at a time. Backends hold
//! solver-native state and are not `Send`: each worker creates its own
//! through a [`SolverFactory`] and drops it when the worker ends.

use crate::config::SolverConfig;
use crate::errors::Result;
use crate::features::smt::domain::SatOutcome;
use crate::features::symbolic::{Guard, IntSemantics, Sort, VarId};
use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "z3")]
pub mod z3_backend;

#[cfg(feature = "z3")]
pub use z3_backend::Z3Backend;

/// Solver capability trait
pub trait ConstraintSolver {
    /// Name of this solver
    fn name(&self) -> &'static str;

    /// Decide `formula`. `vars` lists every free variable it mentions; a
    /// SAT model must assign each of them.
    fn check(&mut self, formula: &Guard, vars: &BTreeMap<VarId, Sort>) -> Result<SatOutcome>;
}

/// Per-call solver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverSettings {
    pub timeout_ms: u64,
    pub seed: u32,
    pub semantics: IntSemantics,
}

impl From<&SolverConfig> for SolverSettings {
    fn from(config: &SolverConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            seed: config.seed,
            semantics: config.semantics(),
        }
    }
}

/// Creates one backend per worker
pub type SolverFactory = Arc<dyn Fn() -> Result<Box<dyn ConstraintSolver>> + Send + Sync>;

/// Factory for the Z3 backend
#[cfg(feature = "z3")]
pub fn z3_factory(settings: SolverSettings) -> SolverFactory {
    Arc::new(move || Ok(Box::new(Z3Backend::new(settings)) as Box<dyn ConstraintSolver>))
}

/// Without the `z3` feature the backend cannot be created
#[cfg(not(feature = "z3"))]
pub fn z3_factory(_settings: SolverSettings) -> SolverFactory {
    Arc::new(|| {
        Err(crate::errors::AnalysisError::solver_unavailable(
            "spanwatch-core was built without the `z3` feature",
        ))
    })
}
