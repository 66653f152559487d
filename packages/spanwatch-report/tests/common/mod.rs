//! Common test utilities for spanwatch-report

#![allow(dead_code)]

use spanwatch_core::config::{AnalysisConfig, PatternConfig};
use spanwatch_core::errors::Result;
use spanwatch_core::features::smt::{ConstraintSolver, SatOutcome, SolverFactory};
use spanwatch_core::features::symbolic::{Guard, Sort, SymbolicValue, VarId};
use spanwatch_core::pipeline::{CandidateSite, SpanAnalyzer};
use spanwatch_core::{Report, SiteId};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Backend for runs whose sites are all decided in-process
struct Unreachable;

impl ConstraintSolver for Unreachable {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn check(&mut self, _: &Guard, _: &BTreeMap<VarId, Sort>) -> Result<SatOutcome> {
        Ok(SatOutcome::Unsat)
    }
}

fn factory() -> SolverFactory {
    Arc::new(|| Ok(Box::new(Unreachable) as Box<dyn ConstraintSolver>))
}

pub fn literal_site(function: &str, line: usize, value: &str) -> CandidateSite {
    CandidateSite::new(
        SiteId::new(function, 0, format!("src/main.rs:{}:5: {}:40", line, line)),
        SymbolicValue::str(value),
    )
}

/// Analyze literal sites against `/proc/self/mem` and `RUSTC`
pub fn analyze(sites: &[CandidateSite]) -> Report {
    let config = AnalysisConfig::default().workers(2).patterns(vec![
        PatternConfig::new("proc_self_mem", "/proc/self/mem").sink("std::fs::write", 0),
        PatternConfig::new("rustc_env", "RUSTC").sink("std::env::set_var", 0),
    ]);
    SpanAnalyzer::with_solver_factory(config, factory())
        .unwrap()
        .analyze(sites)
        .unwrap()
        .report
}
