//! Per-site decision procedure
//!
//! Path guards are folded once; every applicable pattern (configuration
//! order) contributes alternatives (boundary order). The first SAT
//! alternative decides the site. Otherwise the site is UNKNOWN if any
//! alternative was undecided, else UNSAT.

use super::site::CandidateSite;
use crate::errors::{AnalysisError, ErrorScope, Result};
use crate::features::path_condition::PathConditionCollector;
use crate::features::pattern::{PatternMatcher, PatternSet};
use crate::features::smt::{SatOracle, SatOutcome, UnknownReason};
use crate::features::verdict::{PatternMatch, Verdict};
use tracing::{debug, warn};

/// Decide one site; site-scoped errors are returned, not absorbed
pub fn analyze_site(
    site: &CandidateSite,
    patterns: &PatternSet,
    oracle: &mut SatOracle,
) -> Result<Verdict> {
    site.validate()?;
    let collector = PathConditionCollector::from_guards(site.path_conditions.iter().cloned())?;
    let path = collector.fold();
    let rendered = site.value.to_string();

    let mut first_unknown: Option<(PatternMatch, UnknownReason)> = None;

    for pattern in patterns.applicable(&site.id.function, site.id.arg_index) {
        let alternatives = PatternMatcher::alternatives(pattern, &site.value, &path)?;
        for (k, alternative) in alternatives.iter().enumerate() {
            let matched = PatternMatch {
                pattern: pattern.name.clone(),
                template: pattern.to_string(),
                alternative: k,
            };
            match oracle.decide(&path, alternative)? {
                SatOutcome::Sat { model } => {
                    debug!(site = %site.id, pattern = %pattern.name, alternative = k, "SAT");
                    return Ok(Verdict::new(site.id.clone(), rendered, SatOutcome::sat(model))
                        .with_match(matched));
                }
                SatOutcome::Unsat => {}
                SatOutcome::Unknown { reason } => {
                    if first_unknown.is_none() {
                        first_unknown = Some((matched, reason));
                    }
                }
            }
        }
    }

    Ok(match first_unknown {
        Some((matched, reason)) => {
            Verdict::new(site.id.clone(), rendered, SatOutcome::unknown(reason)).with_match(matched)
        }
        None => Verdict::new(site.id.clone(), rendered, SatOutcome::Unsat),
    })
}

/// Decide one site, turning site-scoped errors into UNKNOWN verdicts
pub fn analyze_site_or_unknown(
    site: &CandidateSite,
    patterns: &PatternSet,
    oracle: &mut SatOracle,
) -> Result<Verdict> {
    match analyze_site(site, patterns, oracle) {
        Ok(verdict) => Ok(verdict),
        Err(err) if err.scope() == ErrorScope::Site => {
            warn!(site = %site.id, error = %err, "Site reported as UNKNOWN");
            let reason = match err {
                AnalysisError::TypeMismatch(detail) => UnknownReason::TypeMismatch(detail),
                AnalysisError::SolverTimeout { .. } => UnknownReason::Timeout,
                other => UnknownReason::SolverDeclined(other.to_string()),
            };
            Ok(Verdict::new(
                site.id.clone(),
                site.value.to_string(),
                SatOutcome::unknown(reason),
            ))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternConfig;
    use crate::features::pattern::MatchMode;
    use crate::features::smt::{ConstraintSolver, Model};
    use crate::features::symbolic::{Guard, IntSemantics, Sort, SymbolicValue, VarId};
    use crate::features::verdict::SiteId;
    use std::collections::{BTreeMap, VecDeque};

    /// Backend replaying a fixed answer sequence
    struct Scripted(VecDeque<SatOutcome>);

    impl ConstraintSolver for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn check(&mut self, _: &Guard, _: &BTreeMap<VarId, Sort>) -> Result<SatOutcome> {
            Ok(self.0.pop_front().unwrap_or(SatOutcome::Unsat))
        }
    }

    fn oracle(answers: Vec<SatOutcome>) -> SatOracle {
        SatOracle::new(Box::new(Scripted(answers.into())), IntSemantics::Unbounded)
    }

    fn symbolic_site() -> CandidateSite {
        CandidateSite::new(
            SiteId::new("std::fs::write", 0, "src/main.rs:9:5: 9:40"),
            SymbolicValue::concat(vec![SymbolicValue::string_var("dir"), SymbolicValue::str("/mem")])
                .unwrap(),
        )
    }

    fn patterns() -> PatternSet {
        PatternSet::compile(&[
            PatternConfig::new("first", "/proc/self/mem"),
            PatternConfig::new("second", "/proc/*/mem").mode(MatchMode::Contains),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_sat_alternative_recorded() {
        // first: 1 alternative, second (contains over 2 parts): 2 alternatives
        let mut oracle = oracle(vec![
            SatOutcome::Unsat,
            SatOutcome::unknown(UnknownReason::Timeout),
            SatOutcome::sat(Model::new()),
        ]);
        let verdict = analyze_site(&symbolic_site(), &patterns(), &mut oracle).unwrap();
        let matched = verdict.matched.unwrap();
        assert!(verdict.outcome.is_sat());
        assert_eq!(matched.pattern, "second");
        assert_eq!(matched.alternative, 1);
    }

    #[test]
    fn test_unknown_when_nothing_sat() {
        let mut oracle = oracle(vec![
            SatOutcome::Unsat,
            SatOutcome::unknown(UnknownReason::Timeout),
            SatOutcome::Unsat,
        ]);
        let verdict = analyze_site(&symbolic_site(), &patterns(), &mut oracle).unwrap();
        assert_eq!(verdict.outcome, SatOutcome::unknown(UnknownReason::Timeout));
        assert_eq!(verdict.matched.unwrap().pattern, "second");
    }

    #[test]
    fn test_unsat_when_all_unsat() {
        let mut oracle = oracle(vec![]);
        let verdict = analyze_site(&symbolic_site(), &patterns(), &mut oracle).unwrap();
        assert!(verdict.outcome.is_unsat());
        assert!(verdict.matched.is_none());
        assert_eq!(oracle.stats().total_queries, 3);
    }

    #[test]
    fn test_no_applicable_pattern_is_unsat() {
        let mut site = symbolic_site();
        site.id.function = "std::fs::read".to_string();
        let set = PatternSet::compile(&crate::config::default_patterns()).unwrap();
        let mut oracle = oracle(vec![SatOutcome::sat(Model::new())]);
        let verdict = analyze_site(&site, &set, &mut oracle).unwrap();
        assert!(verdict.outcome.is_unsat());
        assert_eq!(oracle.stats().total_queries, 0);
    }

    #[test]
    fn test_type_mismatch_becomes_unknown() {
        let site = symbolic_site().with_guard(Guard::Compare {
            op: crate::features::symbolic::CompareOp::Lt,
            left: SymbolicValue::string_var("dir"),
            right: SymbolicValue::str("a"),
        });
        let mut oracle = oracle(vec![]);
        assert!(analyze_site(&site, &patterns(), &mut oracle).is_err());

        let verdict = analyze_site_or_unknown(&site, &patterns(), &mut oracle).unwrap();
        assert!(matches!(
            verdict.outcome,
            SatOutcome::Unknown {
                reason: UnknownReason::TypeMismatch(_)
            }
        ));
    }
}
