//! Analysis pipeline
//!
//! ```text
//! SiteBatch → SpanAnalyzer (rayon workers, one backend each)
//!          → analyze_site: fold guards → pattern alternatives → oracle
//!          → ConcurrentReportBuilder → Report
//! ```

pub mod analyzer;
pub mod site;
pub mod site_analysis;

pub use analyzer::{AnalysisRun, SpanAnalyzer};
pub use site::{CandidateSite, SiteBatch, SITE_BATCH_VERSION};
pub use site_analysis::{analyze_site, analyze_site_or_unknown};
