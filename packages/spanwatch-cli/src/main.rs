//! spanwatch CLI
//!
//! # Usage
//!
//! ```bash
//! # Analyze one batch of candidate sites
//! spanwatch analyze sites.json --csv dangerous_spans.csv --json report.json
//!
//! # Run the safe/unsafe harness
//! spanwatch eval tests/crates --results tests/crates/results.csv
//! ```
//!
//! `analyze` exits 0 when no dangerous span is found, 1 when at least one
//! is reported and 2 on a run-fatal error.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use spanwatch_cli::{evaluate_root, resolve_config, ConfigArgs};
use spanwatch_core::config::Preset;
use spanwatch_core::pipeline::{SiteBatch, SpanAnalyzer};
use spanwatch_report::{CsvSpanWriter, JsonReportWriter, ReportSerializer, CSV_NAME};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "spanwatch")]
#[command(about = "Satisfiability-based dangerous span analysis", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AnalyzerFlags {
    /// YAML configuration file (version: 1)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset used when no configuration file is given
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<Preset>,

    /// Worker count (0 = number of CPUs)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-call solver timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl From<AnalyzerFlags> for ConfigArgs {
    fn from(flags: AnalyzerFlags) -> Self {
        Self {
            config: flags.config,
            preset: flags.preset,
            workers: flags.workers,
            timeout_ms: flags.timeout_ms,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a batch of candidate sites
    Analyze {
        /// Site batch (JSON, version 1)
        sites: PathBuf,

        /// Span table to append to
        #[arg(long, default_value = CSV_NAME)]
        csv: PathBuf,

        /// Full JSON report
        #[arg(long)]
        json: Option<PathBuf>,

        #[command(flatten)]
        flags: AnalyzerFlags,
    },

    /// Run the safe/unsafe evaluation harness
    Eval {
        /// Directory holding `safe/` and `unsafe/`
        root: PathBuf,

        /// Results table (default: <root>/results.csv)
        #[arg(long)]
        results: Option<PathBuf>,

        /// Also write dangerous_spans.csv into each crate directory
        #[arg(long)]
        keep_spans: bool,

        #[command(flatten)]
        flags: AnalyzerFlags,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            sites,
            csv,
            json,
            flags,
        } => run_analyze(sites, csv, json, flags.into()),
        Commands::Eval {
            root,
            results,
            keep_spans,
            flags,
        } => run_eval(root, results, keep_spans, flags.into()),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run_analyze(
    sites: PathBuf,
    csv: PathBuf,
    json: Option<PathBuf>,
    args: ConfigArgs,
) -> Result<ExitCode> {
    let config = resolve_config(&args)?;
    let analyzer = SpanAnalyzer::new(config)?;
    let batch = SiteBatch::load(&sites)?;
    let run = analyzer.analyze(&batch.sites)?;

    println!("=== Dangerous Spans ===");
    if run.report.has_dangerous() {
        for verdict in run.report.dangerous() {
            println!("{} -> {}", verdict, verdict.dangerous_value());
        }
    } else {
        println!("No dangerous spans found.");
    }

    CsvSpanWriter::new(csv).write(&run.report)?;
    if let Some(path) = json {
        JsonReportWriter::new(path).write(&run.report)?;
    }

    let summary = run.report.summary();
    let rates = run.stats.hit_rates();
    println!(
        "\n[SUMMARY] {} sites: {} SAT, {} UNSAT, {} UNKNOWN (lightweight {:.1}%, solver {:.1}%)",
        summary.total, summary.sat, summary.unsat, summary.unknown, rates.lightweight, rates.solver
    );

    Ok(if summary.dangerous() > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_eval(
    root: PathBuf,
    results: Option<PathBuf>,
    keep_spans: bool,
    args: ConfigArgs,
) -> Result<ExitCode> {
    let config = resolve_config(&args)?;
    let analyzer = SpanAnalyzer::new(config)?;
    let summary = evaluate_root(&root, &analyzer, keep_spans)?;

    for outcome in &summary.outcomes {
        println!("[INFO] {}: {} → {}", outcome.group, outcome.name, outcome.result_label());
    }

    let results = results.unwrap_or_else(|| root.join("results.csv"));
    summary.write_results(&results)?;

    println!("\n[SUMMARY] Tests passed: {} / {}", summary.passed(), summary.total());
    if summary.all_passed() {
        println!("[ALL TESTS PASSED]");
    } else {
        println!("[FAILED TESTS]:");
        for outcome in summary.failed() {
            println!("  - {}/{}", outcome.group, outcome.name);
        }
    }
    println!("\n[DONE] Wrote {}", results.display());

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
