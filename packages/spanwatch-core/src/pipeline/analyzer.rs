//! Span Analyzer
//!
//! Owns the validated configuration, the compiled pattern set and the
//! solver factory for one analysis run. Sites are pulled from a shared
//! cursor by a fixed set of workers; each worker creates its own solver
//! backend when it starts and drops it when the cursor runs dry.

use super::site::CandidateSite;
use super::site_analysis::analyze_site_or_unknown;
use crate::config::{AnalysisConfig, Validatable};
use crate::errors::{AnalysisError, Result};
use crate::features::pattern::PatternSet;
use crate::features::smt::{z3_factory, OracleStats, SatOracle, SolverFactory, SolverSettings};
use crate::features::verdict::{ConcurrentReportBuilder, Report};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, error, info};

/// Result of one analysis run
#[derive(Debug)]
pub struct AnalysisRun {
    pub report: Report,
    pub stats: OracleStats,
}

pub struct SpanAnalyzer {
    config: AnalysisConfig,
    patterns: PatternSet,
    factory: SolverFactory,
}

/// State shared by all workers of one run
struct RunState<'a> {
    sites: &'a [CandidateSite],
    cursor: AtomicUsize,
    abort: AtomicBool,
    builder: ConcurrentReportBuilder,
    stats: Mutex<OracleStats>,
    fatal: Mutex<Option<AnalysisError>>,
}

impl RunState<'_> {
    fn fail(&self, err: AnalysisError) {
        self.abort.store(true, Ordering::SeqCst);
        let mut fatal = self.fatal.lock();
        if fatal.is_none() {
            *fatal = Some(err);
        }
    }
}

impl SpanAnalyzer {
    /// Build an analyzer backed by Z3
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let factory = z3_factory(SolverSettings::from(&config.solver));
        Self::with_solver_factory(config, factory)
    }

    /// Build an analyzer with a custom backend factory
    pub fn with_solver_factory(config: AnalysisConfig, factory: SolverFactory) -> Result<Self> {
        config.validate()?;
        let patterns = PatternSet::compile(&config.patterns)?;
        info!(
            preset = %config.preset,
            patterns = patterns.len(),
            timeout_ms = config.solver.timeout_ms,
            semantics = %config.solver.semantics(),
            "Analyzer ready"
        );
        Ok(Self {
            config,
            patterns,
            factory,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Analyze a batch; the report lists every site once, in input order
    pub fn analyze(&self, sites: &[CandidateSite]) -> Result<AnalysisRun> {
        let started = Instant::now();
        let workers = self
            .config
            .parallel
            .effective_workers()
            .min(sites.len())
            .max(1);

        let state = RunState {
            sites,
            cursor: AtomicUsize::new(0),
            abort: AtomicBool::new(false),
            builder: ConcurrentReportBuilder::with_capacity(sites.len()),
            stats: Mutex::new(OracleStats::default()),
            fatal: Mutex::new(None),
        };

        if !sites.is_empty() {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("spanwatch-worker-{}", i))
                .build()
                .map_err(|e| AnalysisError::WorkerPool(e.to_string()))?;

            let state_ref = &state;
            pool.scope(|scope| {
                for worker in 0..workers {
                    scope.spawn(move |_| self.run_worker(worker, state_ref));
                }
            });
        }

        if let Some(err) = state.fatal.into_inner() {
            error!(error = %err, "Analysis aborted");
            return Err(err);
        }

        let report = state.builder.finalize();
        let stats = state.stats.into_inner();
        let summary = report.summary();
        info!(
            sites = summary.total,
            sat = summary.sat,
            unsat = summary.unsat,
            unknown = summary.unknown,
            workers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis finished"
        );
        Ok(AnalysisRun { report, stats })
    }

    fn run_worker(&self, worker: usize, state: &RunState<'_>) {
        let backend = match (self.factory)() {
            Ok(backend) => backend,
            Err(err) => {
                state.fail(err);
                return;
            }
        };
        let mut oracle = SatOracle::new(backend, self.config.solver.semantics());
        debug!(worker, backend = oracle.backend_name(), "Worker started");

        while !state.abort.load(Ordering::SeqCst) {
            let index = state.cursor.fetch_add(1, Ordering::SeqCst);
            let Some(site) = state.sites.get(index) else {
                break;
            };
            match analyze_site_or_unknown(site, &self.patterns, &mut oracle) {
                Ok(verdict) => state.builder.submit(index, verdict),
                Err(err) => {
                    state.fail(err);
                    break;
                }
            }
        }

        state.stats.lock().merge(oracle.stats());
        debug!(worker, queries = oracle.stats().total_queries, "Worker finished");
    }
}
