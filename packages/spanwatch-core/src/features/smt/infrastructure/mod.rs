//! SMT infrastructure: lightweight stage, solver backends, oracle

pub mod lightweight_checker;
pub mod oracle;
pub mod solvers;

pub use lightweight_checker::LightweightChecker;
pub use oracle::{HitRates, OracleStats, SatOracle};
pub use solvers::{z3_factory, ConstraintSolver, SolverFactory, SolverSettings};
