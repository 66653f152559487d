//! Test data builders

use spanwatch_core::config::{AnalysisConfig, PatternConfig};
use spanwatch_core::errors::{AnalysisError, Result};
use spanwatch_core::features::pattern::MatchMode;
use spanwatch_core::features::smt::{ConstraintSolver, SatOutcome, SolverFactory, UnknownReason};
use spanwatch_core::features::symbolic::{Guard, Sort, SymbolicValue, VarId};
use spanwatch_core::features::verdict::SiteId;
use spanwatch_core::pipeline::CandidateSite;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const WRITE: &str = "std::fs::write";

/// Builder for CandidateSite
#[derive(Debug)]
pub struct SiteBuilder {
    function: String,
    arg_index: usize,
    span: String,
    guards: Vec<Guard>,
}

impl SiteBuilder {
    pub fn new(span: impl Into<String>) -> Self {
        Self {
            function: WRITE.to_string(),
            arg_index: 0,
            span: span.into(),
            guards: Vec::new(),
        }
    }

    pub fn sink(mut self, function: impl Into<String>, arg_index: usize) -> Self {
        self.function = function.into();
        self.arg_index = arg_index;
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn value(self, value: SymbolicValue) -> CandidateSite {
        CandidateSite::new(SiteId::new(self.function, self.arg_index, self.span), value)
            .with_guards(self.guards)
    }
}

/// Span label for the i-th generated site
pub fn span(i: usize) -> String {
    format!("src/main.rs:{}:5: {}:40", i + 1, i + 1)
}

pub fn s(value: &str) -> SymbolicValue {
    SymbolicValue::str(value)
}

pub fn sv(name: &str) -> SymbolicValue {
    SymbolicValue::string_var(name)
}

pub fn iv(name: &str) -> SymbolicValue {
    SymbolicValue::int_var(name)
}

pub fn int(value: i64) -> SymbolicValue {
    SymbolicValue::int(value)
}

pub fn concat(parts: Vec<SymbolicValue>) -> SymbolicValue {
    SymbolicValue::concat(parts).unwrap()
}

/// Configuration with a single exact pattern that applies to every sink
pub fn exact_config(name: &str, template: &str) -> AnalysisConfig {
    AnalysisConfig::default().patterns(vec![PatternConfig::new(name, template)])
}

/// Configuration with a single contains pattern that applies to every sink
pub fn contains_config(name: &str, template: &str) -> AnalysisConfig {
    AnalysisConfig::default()
        .patterns(vec![PatternConfig::new(name, template).mode(MatchMode::Contains)])
}

/// Backend that answers every non-trivial query with UNKNOWN
pub struct Declining;

impl ConstraintSolver for Declining {
    fn name(&self) -> &'static str {
        "declining"
    }

    fn check(&mut self, _: &Guard, _: &BTreeMap<VarId, Sort>) -> Result<SatOutcome> {
        Ok(SatOutcome::unknown(UnknownReason::SolverDeclined(
            "mock backend".to_string(),
        )))
    }
}

pub fn declining_factory() -> SolverFactory {
    Arc::new(|| Ok(Box::new(Declining) as Box<dyn ConstraintSolver>))
}

pub fn unavailable_factory() -> SolverFactory {
    Arc::new(|| Err(AnalysisError::solver_unavailable("libz3 not found")))
}
