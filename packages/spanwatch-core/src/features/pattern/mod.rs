//! Pattern Matcher
//!
//! Dangerous path templates and their encoding as constraint alternatives.

pub mod domain;
pub mod infrastructure;

pub use domain::{DangerousPattern, MatchMode, PatternSet, Segment};
pub use infrastructure::PatternMatcher;
