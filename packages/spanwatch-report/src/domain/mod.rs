//! Domain layer for report serialization
//!
//! # Domain Models
//!
//! - `DangerousSpanRow`: one CSV line per dangerous verdict
//! - `JsonReport`: versioned JSON document for the whole report
//!
//! # Port Trait
//!
//! - `ReportSerializer`: writes a finalized report somewhere

use serde::{Deserialize, Serialize};
use spanwatch_core::{Report, ReportSummary, Verdict};
use std::collections::HashMap;

use crate::Result;

/// Default file name of the span table
pub const CSV_NAME: &str = "dangerous_spans.csv";

/// Column header of the span table
pub const CSV_HEADER: &str = "function,value,index,span,result";

/// Current JSON report version
pub const JSON_REPORT_VERSION: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════════

/// One row of the span table
///
/// `index` is 1-based and counts the spans reported for the same
/// `(function, value)` pair, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DangerousSpanRow {
    pub function: String,
    pub value: String,
    pub index: usize,
    pub span: String,
    pub result: String,
}

impl DangerousSpanRow {
    /// Rows for every non-UNSAT verdict, in report order
    pub fn from_report(report: &Report) -> Vec<Self> {
        let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
        report
            .dangerous()
            .map(|verdict| {
                let key = (verdict.site.function.as_str(), verdict.dangerous_value());
                let index = seen.entry(key).or_insert(0);
                *index += 1;
                Self {
                    function: verdict.site.function.clone(),
                    value: verdict.dangerous_value().to_string(),
                    index: *index,
                    span: verdict.site.span.clone(),
                    result: verdict.result_label().to_string(),
                }
            })
            .collect()
    }

    /// Render as one CSV line (no trailing newline)
    pub fn to_csv_line(&self) -> String {
        [
            csv_field(&self.function),
            csv_field(&self.value),
            self.index.to_string(),
            csv_field(&self.span),
            csv_field(&self.result),
        ]
        .join(",")
    }
}

/// Quote a field when it contains a delimiter, quote or line break
pub fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Full JSON report document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: u32,
    pub summary: ReportSummary,
    pub verdicts: Vec<Verdict>,
}

impl JsonReport {
    pub fn from_report(report: &Report) -> Self {
        Self {
            version: JSON_REPORT_VERSION,
            summary: report.summary(),
            verdicts: report.verdicts().to_vec(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Port Trait
// ═══════════════════════════════════════════════════════════════════════════

/// Report serializer capability trait
pub trait ReportSerializer {
    /// Name of this output format
    fn name(&self) -> &'static str;

    /// Write a finalized report
    fn write(&self, report: &Report) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spanwatch_core::features::verdict::VerdictReporter;
    use spanwatch_core::{PatternMatch, SatOutcome, SiteId, UnknownReason};
    use std::collections::BTreeMap;

    fn matched(template: &str) -> Option<PatternMatch> {
        Some(PatternMatch {
            pattern: "p".to_string(),
            template: template.to_string(),
            alternative: 0,
        })
    }

    fn sample_report() -> Report {
        let mut reporter = VerdictReporter::new();
        reporter.record(
            SiteId::new("std::fs::write", 0, "src/main.rs:3:5: 3:30"),
            "concat(f0, \"/mem\")",
            SatOutcome::sat(BTreeMap::new()),
            matched("/proc/self/mem"),
        );
        reporter.record(
            SiteId::new("std::fs::write", 0, "src/main.rs:4:5: 4:30"),
            "\"/tmp/x\"",
            SatOutcome::Unsat,
            None,
        );
        reporter.record(
            SiteId::new("std::fs::write", 0, "src/main.rs:9:5: 9:30"),
            "dir",
            SatOutcome::unknown(UnknownReason::Timeout),
            matched("/proc/self/mem"),
        );
        reporter.finalize()
    }

    #[test]
    fn test_rows_skip_unsat_and_count_per_value() {
        let rows = DangerousSpanRow::from_report(&sample_report());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, "/proc/self/mem");
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].result, "SAT");
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].result, "UNKNOWN");
    }

    #[test]
    fn test_csv_line_plain() {
        let rows = DangerousSpanRow::from_report(&sample_report());
        assert_eq!(
            rows[0].to_csv_line(),
            "std::fs::write,/proc/self/mem,1,src/main.rs:3:5: 3:30,SAT"
        );
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn test_json_report_summary() {
        let json = JsonReport::from_report(&sample_report());
        assert_eq!(json.version, JSON_REPORT_VERSION);
        assert_eq!(json.summary.total, 3);
        assert_eq!(json.summary.dangerous(), 2);
        assert_eq!(json.verdicts.len(), 3);
    }
}
