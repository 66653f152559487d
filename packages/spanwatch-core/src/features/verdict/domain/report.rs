//! Report Domain Model
//!
//! A report is only obtainable from a builder's `finalize`, so it is never
//! observed half-filled.

use super::verdict::Verdict;
use crate::features::smt::SatOutcome;
use serde::{Deserialize, Serialize};

/// Finalized, discovery-ordered verdict sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    verdicts: Vec<Verdict>,
}

/// Summary counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub sat: usize,
    pub unsat: usize,
    pub unknown: usize,
}

impl ReportSummary {
    pub fn dangerous(&self) -> usize {
        self.sat + self.unknown
    }
}

impl Report {
    pub(crate) fn from_ordered(verdicts: Vec<Verdict>) -> Self {
        Self { verdicts }
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// SAT and UNKNOWN verdicts, in report order
    pub fn dangerous(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| v.is_dangerous())
    }

    pub fn has_dangerous(&self) -> bool {
        self.verdicts.iter().any(Verdict::is_dangerous)
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.verdicts.len(),
            ..Default::default()
        };
        for verdict in &self.verdicts {
            match verdict.outcome {
                SatOutcome::Sat { .. } => summary.sat += 1,
                SatOutcome::Unsat => summary.unsat += 1,
                SatOutcome::Unknown { .. } => summary.unknown += 1,
            }
        }
        summary
    }
}

impl IntoIterator for Report {
    type Item = Verdict;
    type IntoIter = std::vec::IntoIter<Verdict>;

    fn into_iter(self) -> Self::IntoIter {
        self.verdicts.into_iter()
    }
}
