//! Infrastructure layer - Report writers

pub mod csv;
pub mod json;

pub use csv::CsvSpanWriter;
pub use json::JsonReportWriter;
