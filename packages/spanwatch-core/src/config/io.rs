//! Configuration I/O
//!
//! Defines the YAML schema types. Loading lives in `analysis_config.rs`.

use super::analysis_config::{AnalysisConfig, IntMode, ParallelConfig, PatternConfig, SolverConfig};
use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverOverrides>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelConfig>,

    /// Replaces the built-in sink table when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<PatternConfig>>,
}

/// Partial solver section; absent fields keep the preset's value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_semantics: Option<IntMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_width: Option<u32>,
}

impl SolverOverrides {
    pub fn apply_to(self, mut base: SolverConfig) -> SolverConfig {
        if let Some(timeout_ms) = self.timeout_ms {
            base.timeout_ms = timeout_ms;
        }
        if let Some(seed) = self.seed {
            base.seed = seed;
        }
        if let Some(mode) = self.int_semantics {
            base.int_semantics = mode;
        }
        if let Some(width) = self.int_width {
            base.int_width = width;
        }
        base
    }
}

impl ConfigFileV1 {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            version: Some(1),
            preset: Some(config.preset.as_str().to_string()),
            solver: Some(SolverOverrides {
                timeout_ms: Some(config.solver.timeout_ms),
                seed: Some(config.solver.seed),
                int_semantics: Some(config.solver.int_semantics),
                int_width: Some(config.solver.int_width),
            }),
            parallel: Some(config.parallel.clone()),
            patterns: Some(config.patterns.clone()),
        }
    }
}
