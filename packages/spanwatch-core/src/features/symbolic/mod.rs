//! Symbolic Value Model
//!
//! How a string, integer or boolean is assembled at a candidate site:
//! literals, attacker-controlled free variables, concatenation, arithmetic
//! and guarded choice. Values are checked on construction and lowered to
//! Z3 terms for the oracle.

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::{canonicalize_guard, canonicalize_value, concat_parts, ConcreteEvaluator};

#[cfg(feature = "z3")]
pub use infrastructure::{Term, Z3Lowering};
