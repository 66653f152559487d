//! Symbolic value domain: values, guards, and integer semantics

pub mod guard;
pub mod semantics;
pub mod value;

pub use guard::{CompareOp, Guard};
pub use semantics::{sign_extend, wrap, IntSemantics};
pub use value::{ArithOp, Assignment, ConcreteValue, Sort, SymbolicValue, VarId};
