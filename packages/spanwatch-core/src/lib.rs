/*
 * spanwatch-core - Satisfiability-Based Dangerous Span Analysis
 *
 * Feature-First Architecture:
 * - config/    : Presets, versioned YAML, validation
 * - features/  : Vertical slices (symbolic → pattern → path_condition → smt → verdict)
 * - pipeline/  : Per-run analyzer over a rayon worker pool
 *
 * Decides, for each candidate sink argument, whether attacker-controlled
 * inputs exist that satisfy every branch guard on the path AND make the
 * argument match a dangerous pattern.
 */

#![allow(clippy::new_without_default)] // Builders with explicit constructors
#![allow(clippy::module_inception)] // Module naming intentional

pub mod config;
pub mod errors;
pub mod features;
pub mod pipeline;

pub use config::{AnalysisConfig, Preset};
pub use errors::{AnalysisError, ErrorScope, Result};
pub use features::pattern::{DangerousPattern, MatchMode, PatternSet, Segment};
pub use features::smt::{Model, SatOutcome, UnknownReason};
pub use features::symbolic::{ArithOp, CompareOp, ConcreteValue, Guard, IntSemantics, Sort, SymbolicValue};
pub use features::verdict::{PatternMatch, Report, ReportSummary, SiteId, Verdict};
pub use pipeline::{AnalysisRun, CandidateSite, SiteBatch, SpanAnalyzer};
