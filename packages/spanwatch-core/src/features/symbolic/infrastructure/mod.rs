//! Symbolic infrastructure: canonical forms, concrete evaluation, Z3 lowering

pub mod canonical;
pub mod evaluator;

#[cfg(feature = "z3")]
pub mod lowering;

pub use canonical::{canonicalize_guard, canonicalize_value, concat_parts};
pub use evaluator::ConcreteEvaluator;

#[cfg(feature = "z3")]
pub use lowering::{Term, Z3Lowering};
