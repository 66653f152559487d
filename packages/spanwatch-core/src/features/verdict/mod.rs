//! Verdict Reporter
//!
//! Maps (site, oracle result) pairs to verdicts and accumulates them into an
//! append-only, discovery-ordered report.

pub mod domain;
pub mod infrastructure;

pub use domain::{PatternMatch, Report, ReportSummary, SiteId, Verdict};
pub use infrastructure::{ConcurrentReportBuilder, VerdictReporter};
