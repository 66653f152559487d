//! Analysis configuration
//!
//! `AnalysisConfig` is the single object an analyzer is built from. It starts
//! from a [`Preset`], takes closure-style overrides, and must pass
//! [`Validatable::validate`] before use.

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigFileV1;
use super::preset::Preset;
use super::validation::{Validatable, ValidatableCollection};
use crate::features::pattern::MatchMode;
use crate::features::symbolic::IntSemantics;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest supported bit-vector width
pub const MAX_INT_WIDTH: u32 = 64;

/// Integer model selector as written in YAML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntMode {
    /// Mathematical integers
    #[default]
    Unbounded,
    /// Two's-complement wraparound at `int_width` bits
    Wrapping,
}

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Per-call timeout in milliseconds (1..=600000)
    pub timeout_ms: u64,

    /// Fixed random seed handed to the solver
    pub seed: u32,

    /// Integer model
    pub int_semantics: IntMode,

    /// Bit width for `wrapping` (1..=64)
    pub int_width: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::for_preset(Preset::Balanced)
    }
}

impl SolverConfig {
    pub fn for_preset(preset: Preset) -> Self {
        Self {
            timeout_ms: preset.timeout_ms(),
            seed: 0,
            int_semantics: IntMode::Unbounded,
            int_width: MAX_INT_WIDTH,
        }
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.int_semantics = IntMode::Unbounded;
        self
    }

    pub fn wrapping(mut self, bits: u32) -> Self {
        self.int_semantics = IntMode::Wrapping;
        self.int_width = bits;
        self
    }

    /// Resolved integer semantics
    pub fn semantics(&self) -> IntSemantics {
        match self.int_semantics {
            IntMode::Unbounded => IntSemantics::Unbounded,
            IntMode::Wrapping => IntSemantics::Wrapping {
                bits: self.int_width,
            },
        }
    }
}

impl Validatable for SolverConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.timeout_ms < 1 || self.timeout_ms > 600_000 {
            return Err(ConfigError::range_with_hint(
                "solver.timeout_ms",
                self.timeout_ms,
                1,
                600_000,
                "A zero timeout would turn every verdict into UNKNOWN",
            ));
        }

        if self.int_semantics == IntMode::Wrapping
            && (self.int_width < 1 || self.int_width > MAX_INT_WIDTH)
        {
            return Err(ConfigError::range_with_hint(
                "solver.int_width",
                self.int_width,
                1,
                MAX_INT_WIDTH,
                "Bit-vector width must fit a machine integer",
            ));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "SolverConfig"
    }
}

/// Parallelism configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// Number of workers (0=auto, 1..=256)
    pub workers: usize,
}

impl ParallelConfig {
    /// Worker count with `0` resolved to the number of CPUs
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

impl Validatable for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.workers > 256 {
            return Err(ConfigError::range_with_hint(
                "parallel.workers",
                self.workers,
                0,
                256,
                "Number of workers must be reasonable (0=auto)",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ParallelConfig"
    }
}

/// One dangerous pattern as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    /// Unique pattern name, reported with SAT verdicts
    pub name: String,

    /// Path template; `*` is a wildcard, `\*` a literal star
    pub template: String,

    #[serde(default)]
    pub mode: MatchMode,

    /// Sink functions the pattern applies to (empty = every site)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sinks: Vec<String>,

    /// Sink argument the pattern applies to (absent = any argument)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_index: Option<usize>,
}

impl PatternConfig {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            mode: MatchMode::Exact,
            sinks: Vec::new(),
            arg_index: None,
        }
    }

    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn sink(mut self, function: impl Into<String>, arg_index: usize) -> Self {
        self.sinks.push(function.into());
        self.arg_index = Some(arg_index);
        self
    }
}

/// Built-in sink table
pub fn default_patterns() -> Vec<PatternConfig> {
    vec![
        PatternConfig::new("proc_self_mem", "/proc/self/mem").sink("std::fs::write", 0),
        PatternConfig::new("proc_any", "/proc/*").sink("std::fs::write", 0),
        PatternConfig::new("rustc_env", "RUSTC").sink("std::env::set_var", 0),
        PatternConfig::new("rm_rf", "rm -rf *").sink("std::process::Command::new", 0),
    ]
}

/// Complete analysis configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub preset: Preset,
    pub solver: SolverConfig,
    pub parallel: ParallelConfig,
    pub patterns: Vec<PatternConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl AnalysisConfig {
    /// Start from a preset with the built-in patterns
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            solver: SolverConfig::for_preset(preset),
            parallel: ParallelConfig::default(),
            patterns: default_patterns(),
        }
    }

    /// Override solver settings
    pub fn solver<F>(mut self, f: F) -> Self
    where
        F: FnOnce(SolverConfig) -> SolverConfig,
    {
        self.solver = f(self.solver);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.parallel.workers = workers;
        self
    }

    /// Replace the pattern set
    pub fn patterns(mut self, patterns: Vec<PatternConfig>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Load a versioned YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![1],
                })
            }
        }

        let preset = match file.preset.as_deref() {
            Some(name) => name.parse::<Preset>()?,
            None => Preset::default(),
        };

        let mut config = Self::preset(preset);
        if let Some(solver) = file.solver {
            config.solver = solver.apply_to(config.solver);
        }
        if let Some(parallel) = file.parallel {
            config.parallel = parallel;
        }
        if let Some(patterns) = file.patterns {
            config.patterns = patterns;
        }

        config.validate()?;
        Ok(config)
    }

    /// Export as versioned YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1::from_config(self);
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.solver.validate()?;
        self.parallel.validate()?;
        self.patterns.validate_all()
    }

    fn config_name(&self) -> &'static str {
        "AnalysisConfig"
    }
}

impl Validatable for PatternConfig {
    // Template structure is checked when the pattern set is compiled
    fn validate(&self) -> ConfigResult<()> {
        if self.sinks.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "pattern '{}' lists an empty sink name",
                self.name
            )));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "PatternConfig"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_defaults_validate() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough] {
            let config = AnalysisConfig::preset(preset);
            assert!(config.validate().is_ok());
            assert_eq!(config.solver.timeout_ms, preset.timeout_ms());
            assert_eq!(config.patterns.len(), 4);
        }
    }

    #[test]
    fn test_solver_override() {
        let config = AnalysisConfig::preset(Preset::Fast).solver(|s| s.timeout_ms(250).seed(7));
        assert_eq!(config.solver.timeout_ms, 250);
        assert_eq!(config.solver.seed, 7);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = AnalysisConfig::default().solver(|s| s.timeout_ms(0));
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_wrapping_width_range() {
        let ok = SolverConfig::default().wrapping(32);
        assert!(ok.validate().is_ok());
        assert_eq!(ok.semantics(), IntSemantics::Wrapping { bits: 32 });

        assert!(SolverConfig::default().wrapping(0).validate().is_err());
        assert!(SolverConfig::default().wrapping(65).validate().is_err());
    }

    #[test]
    fn test_too_many_workers() {
        let config = AnalysisConfig::default().workers(1000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auto_workers() {
        assert!(ParallelConfig::default().effective_workers() >= 1);
        assert_eq!(ParallelConfig { workers: 3 }.effective_workers(), 3);
    }

    #[test]
    fn test_default_sink_table() {
        let patterns = default_patterns();
        let proc_mem = &patterns[0];
        assert_eq!(proc_mem.template, "/proc/self/mem");
        assert_eq!(proc_mem.sinks, vec!["std::fs::write".to_string()]);
        assert_eq!(proc_mem.arg_index, Some(0));
        assert_eq!(proc_mem.mode, MatchMode::Exact);
    }
}
