//! Verdict Reporter
//!
//! Two builders produce a [`Report`]:
//! - [`VerdictReporter`]: single-threaded, appends in call order
//! - [`ConcurrentReportBuilder`]: shared across workers; appends arrive out of
//!   order tagged with their submission index and are put back in discovery
//!   order on finalization
//!
//! Both are consumed by `finalize`, so a report has exactly one
//! finalization point.

use crate::features::smt::SatOutcome;
use crate::features::verdict::domain::{PatternMatch, Report, SiteId, Verdict};
use parking_lot::Mutex;
use tracing::debug;

/// Sequential report builder
#[derive(Debug, Default)]
pub struct VerdictReporter {
    verdicts: Vec<Verdict>,
}

impl VerdictReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a site and its oracle result to a verdict and append it
    pub fn record(
        &mut self,
        site: SiteId,
        value: impl Into<String>,
        outcome: SatOutcome,
        matched: Option<PatternMatch>,
    ) -> &Verdict {
        let mut verdict = Verdict::new(site, value, outcome);
        verdict.matched = matched;
        self.append(verdict)
    }

    /// Append as-is; no deduplication
    pub fn append(&mut self, verdict: Verdict) -> &Verdict {
        self.verdicts.push(verdict);
        let last = self.verdicts.len() - 1;
        &self.verdicts[last]
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn finalize(self) -> Report {
        debug!(verdicts = self.verdicts.len(), "Report finalized");
        Report::from_ordered(self.verdicts)
    }
}

/// Thread-safe report builder keyed by submission index
#[derive(Debug, Default)]
pub struct ConcurrentReportBuilder {
    entries: Mutex<Vec<(usize, Verdict)>>,
}

impl ConcurrentReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append the verdict for the site submitted at `index`
    pub fn submit(&self, index: usize, verdict: Verdict) {
        self.entries.lock().push((index, verdict));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Restore discovery order; equal indices keep arrival order
    pub fn finalize(self) -> Report {
        let mut entries = self.entries.into_inner();
        entries.sort_by_key(|(index, _)| *index);
        debug!(verdicts = entries.len(), "Report finalized");
        Report::from_ordered(entries.into_iter().map(|(_, v)| v).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::smt::{Model, UnknownReason};
    use rayon::prelude::*;

    fn site(i: usize) -> SiteId {
        SiteId::new("std::fs::write", 0, format!("src/lib.rs:{}:1: {}:9", i, i))
    }

    #[test]
    fn test_sequential_order_and_no_dedup() {
        let mut reporter = VerdictReporter::new();
        reporter.record(site(1), "a", SatOutcome::Unsat, None);
        reporter.record(site(1), "a", SatOutcome::Unsat, None);
        reporter.record(site(2), "b", SatOutcome::sat(Model::new()), None);
        let report = reporter.finalize();

        assert_eq!(report.len(), 3);
        assert_eq!(report.verdicts()[2].site, site(2));
        let summary = report.summary();
        assert_eq!((summary.sat, summary.unsat, summary.unknown), (1, 2, 0));
        assert_eq!(summary.dangerous(), 1);
    }

    #[test]
    fn test_empty_report() {
        let report = VerdictReporter::new().finalize();
        assert!(report.is_empty());
        assert!(!report.has_dangerous());
    }

    #[test]
    fn test_concurrent_builder_restores_order() {
        let builder = ConcurrentReportBuilder::with_capacity(200);
        (0..200usize).into_par_iter().rev().for_each(|i| {
            let outcome = if i % 3 == 0 {
                SatOutcome::unknown(UnknownReason::Timeout)
            } else {
                SatOutcome::Unsat
            };
            builder.submit(i, Verdict::new(site(i), "v", outcome));
        });
        assert_eq!(builder.len(), 200);

        let report = builder.finalize();
        let spans: Vec<_> = report.verdicts().iter().map(|v| v.site.clone()).collect();
        let expected: Vec<_> = (0..200).map(site).collect();
        assert_eq!(spans, expected);
        assert_eq!(report.dangerous().count(), 67);
    }
}
