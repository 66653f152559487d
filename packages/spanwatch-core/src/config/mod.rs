//! Configuration System
//!
//! Three levels, from simplest to most complete:
//! - Level 1: Preset - fixes the solver budget
//! - Level 2: Builder overrides - `AnalysisConfig::preset(..).solver(|s| ..)`
//! - Level 3: YAML - versioned schema (`version: 1`)
//!
//! # Examples
//!
//! ```rust,ignore
//! use spanwatch_core::config::{AnalysisConfig, Preset};
//!
//! let config = AnalysisConfig::preset(Preset::Fast);
//!
//! let config = AnalysisConfig::preset(Preset::Balanced)
//!     .solver(|s| s.timeout_ms(2_000).wrapping(32));
//!
//! let config = AnalysisConfig::from_yaml("spanwatch.yaml")?;
//! ```

pub mod analysis_config;
pub mod error;
pub mod io;
pub mod preset;
pub mod validation;

// Re-exports
pub use analysis_config::{
    default_patterns, AnalysisConfig, IntMode, ParallelConfig, PatternConfig, SolverConfig,
    MAX_INT_WIDTH,
};
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, SolverOverrides};
pub use preset::Preset;
pub use validation::{Validatable, ValidatableCollection};
