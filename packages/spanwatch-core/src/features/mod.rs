//! Feature modules, leaf-first
//!
//! Each feature contains:
//! - domain/         - Pure data types and their invariants
//! - infrastructure/ - Algorithms and external solver integration

pub mod path_condition;
pub mod pattern;
pub mod smt;
pub mod symbolic;
pub mod verdict;
