//! spanwatch-report - Serializers for finalized reports
//!
//! ## Outputs
//!
//! - `dangerous_spans.csv`: one row per SAT/UNKNOWN verdict, appended across
//!   runs; the header is written only when the file is created
//! - JSON: the full report with models and summary counts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spanwatch_report::{CsvSpanWriter, JsonReportWriter, ReportSerializer};
//!
//! let run = analyzer.analyze(&batch.sites)?;
//! CsvSpanWriter::new("dangerous_spans.csv").write(&run.report)?;
//! JsonReportWriter::new("report.json").write(&run.report)?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, ReportError, Result};

pub use domain::{
    csv_field, DangerousSpanRow, JsonReport, ReportSerializer, CSV_HEADER, CSV_NAME,
    JSON_REPORT_VERSION,
};
pub use infrastructure::{CsvSpanWriter, JsonReportWriter};
