//! Span table writer
//!
//! Appends to an existing table so several runs (one per compiled crate)
//! can share one file. The header is written only when the file is new.

use crate::domain::{DangerousSpanRow, ReportSerializer, CSV_HEADER};
use crate::Result;
use spanwatch_core::Report;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CsvSpanWriter {
    path: PathBuf,
}

impl CsvSpanWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append rows; returns how many were written
    pub fn append_rows(&self, rows: &[DangerousSpanRow]) -> Result<usize> {
        let file_exists = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        if !file_exists {
            writeln!(writer, "{}", CSV_HEADER)?;
        }
        for row in rows {
            writeln!(writer, "{}", row.to_csv_line())?;
        }
        writer.flush()?;

        debug!(path = %self.path.display(), rows = rows.len(), "Span table updated");
        Ok(rows.len())
    }
}

impl ReportSerializer for CsvSpanWriter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&self, report: &Report) -> Result<()> {
        self.append_rows(&DangerousSpanRow::from_report(report))?;
        Ok(())
    }
}
