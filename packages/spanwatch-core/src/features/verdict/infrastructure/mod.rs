pub mod reporter;

pub use reporter::{ConcurrentReportBuilder, VerdictReporter};
