//! Safe/unsafe evaluation harness
//!
//! Layout: `<root>/{safe,unsafe}/<crate>/sites.json`. A crate is a hit when
//! its report has at least one dangerous span. Safe crates pass without a
//! hit, unsafe crates pass with one.

use anyhow::{Context, Result};
use spanwatch_core::pipeline::{SiteBatch, SpanAnalyzer};
use spanwatch_report::{csv_field, CsvSpanWriter, ReportSerializer, CSV_NAME};
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Site batch file name inside each crate directory
pub const SITES_FILE: &str = "sites.json";

/// Column header of `results.csv`
pub const RESULTS_HEADER: &str = "group,crate,hit,result";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Safe,
    Unsafe,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Safe, Group::Unsafe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Safe => "safe",
            Group::Unsafe => "unsafe",
        }
    }

    pub fn expects_hit(&self) -> bool {
        matches!(self, Group::Unsafe)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateOutcome {
    pub group: Group,
    pub name: String,
    pub hit: bool,
}

impl CrateOutcome {
    pub fn passed(&self) -> bool {
        self.hit == self.group.expects_hit()
    }

    pub fn result_label(&self) -> &'static str {
        if self.passed() {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalSummary {
    pub outcomes: Vec<CrateOutcome>,
}

impl EvalSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CrateOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(CrateOutcome::passed)
    }

    /// Write `results.csv`, replacing any previous file
    pub fn write_results(&self, path: &Path) -> Result<()> {
        let file = fs::File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", RESULTS_HEADER)?;
        for outcome in &self.outcomes {
            writeln!(
                writer,
                "{},{},{},{}",
                outcome.group,
                csv_field(&outcome.name),
                outcome.hit,
                outcome.result_label()
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Evaluate every crate under `root`, safe group first, crates sorted by name
///
/// With `keep_spans`, each crate directory receives its own
/// `dangerous_spans.csv`.
pub fn evaluate_root(root: &Path, analyzer: &SpanAnalyzer, keep_spans: bool) -> Result<EvalSummary> {
    let mut summary = EvalSummary::default();

    for group in Group::ALL {
        let group_dir = root.join(group.as_str());
        if !group_dir.is_dir() {
            warn!(dir = %group_dir.display(), "Group directory missing, skipping");
            continue;
        }

        for crate_dir in crate_dirs(&group_dir)? {
            let name = crate_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let hit = evaluate_crate(&crate_dir, analyzer, keep_spans)?;
            let outcome = CrateOutcome { group, name, hit };
            info!(
                group = %group,
                krate = %outcome.name,
                hit,
                result = outcome.result_label(),
                "Crate evaluated"
            );
            summary.outcomes.push(outcome);
        }
    }

    Ok(summary)
}

fn crate_dirs(group_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(group_dir)
        .with_context(|| format!("cannot list {}", group_dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn evaluate_crate(crate_dir: &Path, analyzer: &SpanAnalyzer, keep_spans: bool) -> Result<bool> {
    let sites_path = crate_dir.join(SITES_FILE);
    if !sites_path.exists() {
        warn!(dir = %crate_dir.display(), "No {} found, treating as no candidate sites", SITES_FILE);
        return Ok(false);
    }

    let batch = SiteBatch::load(&sites_path)
        .with_context(|| format!("cannot load {}", sites_path.display()))?;
    let run = analyzer.analyze(&batch.sites)?;

    if keep_spans {
        CsvSpanWriter::new(crate_dir.join(CSV_NAME)).write(&run.report)?;
    }
    Ok(run.report.has_dangerous())
}
