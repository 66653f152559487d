//! Common test utilities for spanwatch-cli

#![allow(dead_code)]

use spanwatch_core::config::AnalysisConfig;
use spanwatch_core::errors::Result;
use spanwatch_core::features::smt::{ConstraintSolver, SatOutcome, SolverFactory};
use spanwatch_core::features::symbolic::{Guard, Sort, SymbolicValue, VarId};
use spanwatch_core::pipeline::{CandidateSite, SiteBatch, SpanAnalyzer};
use spanwatch_core::SiteId;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

struct AlwaysUnsat;

impl ConstraintSolver for AlwaysUnsat {
    fn name(&self) -> &'static str {
        "always-unsat"
    }

    fn check(&mut self, _: &Guard, _: &BTreeMap<VarId, Sort>) -> Result<SatOutcome> {
        Ok(SatOutcome::Unsat)
    }
}

/// Analyzer over the built-in patterns that never needs libz3
pub fn analyzer() -> SpanAnalyzer {
    let factory: SolverFactory = Arc::new(|| Ok(Box::new(AlwaysUnsat) as Box<dyn ConstraintSolver>));
    SpanAnalyzer::with_solver_factory(AnalysisConfig::default().workers(1), factory).unwrap()
}

/// Write `<root>/<group>/<name>/sites.json` with one `std::fs::write` site per path
pub fn write_crate(root: &Path, group: &str, name: &str, paths: &[&str]) {
    let dir = root.join(group).join(name);
    std::fs::create_dir_all(&dir).unwrap();
    let sites: Vec<CandidateSite> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            CandidateSite::new(
                SiteId::new("std::fs::write", 0, format!("src/main.rs:{}:5: {}:30", i + 1, i + 1)),
                SymbolicValue::str(*path),
            )
        })
        .collect();
    std::fs::write(dir.join("sites.json"), SiteBatch::new(sites).to_json().unwrap()).unwrap();
}
