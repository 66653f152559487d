//! JSON report writer

use crate::domain::{JsonReport, ReportSerializer};
use crate::Result;
use spanwatch_core::Report;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes the full report, replacing any previous file
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(&JsonReport::from_report(report))?)
    }
}

impl ReportSerializer for JsonReportWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, report: &Report) -> Result<()> {
        let content = Self::render(report)?;
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), verdicts = report.len(), "JSON report written");
        Ok(())
    }
}
