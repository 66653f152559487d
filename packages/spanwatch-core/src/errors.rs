//! Error types for spanwatch-core
//!
//! Provides unified error handling across the crate. Every error knows whether
//! it only spoils the site being analyzed or the whole run.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for spanwatch-core operations
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed SymbolicValue/Guard construction
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// The external solver cannot be reached
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),

    /// A single solver call ran out of time
    #[error("Solver timeout after {timeout_ms}ms")]
    SolverTimeout { timeout_ms: u64 },

    /// Pattern with inconsistent literal/wildcard structure
    #[error("Malformed pattern '{name}': {reason}")]
    MalformedPattern { name: String, reason: String },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Candidate-site batch could not be read
    #[error("Input error: {0}")]
    Input(String),

    /// Worker pool could not be started
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How far an error propagates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Captured into the verdict of the offending site; analysis continues
    Site,
    /// Aborts the analysis run before the report is finalized
    Run,
}

impl AnalysisError {
    /// Create a type mismatch error
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        AnalysisError::TypeMismatch(msg.into())
    }

    /// Create a solver unavailable error
    pub fn solver_unavailable(msg: impl Into<String>) -> Self {
        AnalysisError::SolverUnavailable(msg.into())
    }

    /// Create a malformed pattern error
    pub fn malformed_pattern(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::MalformedPattern {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        AnalysisError::Input(msg.into())
    }

    pub fn scope(&self) -> ErrorScope {
        match self {
            AnalysisError::TypeMismatch(_) | AnalysisError::SolverTimeout { .. } => ErrorScope::Site,
            AnalysisError::SolverUnavailable(_)
            | AnalysisError::MalformedPattern { .. }
            | AnalysisError::Config(_)
            | AnalysisError::Input(_)
            | AnalysisError::WorkerPool(_)
            | AnalysisError::Io(_) => ErrorScope::Run,
        }
    }

    pub fn is_fatal_to_run(&self) -> bool {
        self.scope() == ErrorScope::Run
    }
}

/// Result type alias for spanwatch operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_scoped_errors() {
        assert_eq!(
            AnalysisError::type_mismatch("Concat operand is Int").scope(),
            ErrorScope::Site
        );
        assert_eq!(
            AnalysisError::SolverTimeout { timeout_ms: 100 }.scope(),
            ErrorScope::Site
        );
    }

    #[test]
    fn test_run_scoped_errors() {
        assert!(AnalysisError::solver_unavailable("no z3").is_fatal_to_run());
        assert!(AnalysisError::malformed_pattern("p", "empty").is_fatal_to_run());
        assert!(AnalysisError::input("bad json").is_fatal_to_run());
    }

    #[test]
    fn test_error_display() {
        let err = AnalysisError::malformed_pattern("proc_star", "adjacent wildcards");
        assert_eq!(
            err.to_string(),
            "Malformed pattern 'proc_star': adjacent wildcards"
        );
    }
}
