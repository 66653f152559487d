pub mod report;
pub mod verdict;

pub use report::{Report, ReportSummary};
pub use verdict::{PatternMatch, SiteId, Verdict};
