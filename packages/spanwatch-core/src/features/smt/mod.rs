//! Satisfiability Oracle
//!
//! Decides whether a path condition and a pattern alternative can hold at
//! the same time. Trivial formulas are answered in-process; the rest is
//! delegated to Z3.

pub mod domain;
pub mod infrastructure;

pub use domain::{Model, SatOutcome, UnknownReason};
pub use infrastructure::{
    z3_factory, ConstraintSolver, HitRates, LightweightChecker, OracleStats, SatOracle,
    SolverFactory, SolverSettings,
};

#[cfg(feature = "z3")]
pub use infrastructure::solvers::Z3Backend;
