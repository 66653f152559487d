//! spanwatch-cli - Command-line front end
//!
//! - `config`:  resolves CLI flags and YAML into an `AnalysisConfig`
//! - `harness`: safe/unsafe evaluation over a directory of site batches

pub mod config;
pub mod harness;

pub use config::{resolve_config, ConfigArgs};
pub use harness::{evaluate_root, CrateOutcome, EvalSummary, Group, RESULTS_HEADER, SITES_FILE};
